use std::path::PathBuf;

use crate::Parameter;

/// An error that can occur during a transfer.
///
/// Every error is terminal: nothing is retried.
#[derive(Debug)]
pub enum Error {
	Lookup(LookupError),
	Open(OpenError),
	Configure(ConfigureError),
	Input(std::io::Error),
	InputTooLarge(InputTooLarge),
	Write(WriteError),
	Read(ReadError),
	Output(std::io::Error),
}

/// The device name could not be resolved to a serial port.
#[derive(Debug)]
pub struct LookupError {
	pub device: PathBuf,
	pub cause: std::io::Error,
}

/// The serial port could not be opened.
#[derive(Debug)]
pub struct OpenError {
	pub device: PathBuf,
	pub cause: std::io::Error,
}

/// A line setting could not be applied.
///
/// The parameters in `applied` were already set on the device before `parameter` failed.
/// They are not rolled back.
#[derive(Debug)]
pub struct ConfigureError {
	pub parameter: Parameter,
	pub applied: Vec<Parameter>,
	pub cause: std::io::Error,
}

/// The input filled the whole transfer buffer.
///
/// It is not possible to tell if more data was pending, so this is always an error.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InputTooLarge {
	pub limit: usize,
}

/// An error that can occur while writing to the serial port.
#[derive(Debug)]
pub enum WriteError {
	Io(std::io::Error),
	Timeout(WriteTimeout),
}

/// The serial port did not accept all bytes within the write timeout.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WriteTimeout {
	pub written: usize,
	pub requested: usize,
}

/// An error that can occur while reading from the serial port.
#[derive(Debug)]
pub enum ReadError {
	Io(std::io::Error),
	Timeout,
}

/// Describe the cause of an I/O error.
///
/// A few error kinds get a fixed description, everything else uses the message of the error itself.
pub fn cause(error: &std::io::Error) -> std::borrow::Cow<'static, str> {
	match error.kind() {
		std::io::ErrorKind::InvalidInput => "Invalid argument".into(),
		std::io::ErrorKind::Unsupported => "Not supported".into(),
		std::io::ErrorKind::OutOfMemory => "Couldn't allocate memory".into(),
		_ => error.to_string().into(),
	}
}

impl std::error::Error for Error {}
impl std::error::Error for LookupError {}
impl std::error::Error for OpenError {}
impl std::error::Error for ConfigureError {}
impl std::error::Error for InputTooLarge {}
impl std::error::Error for WriteError {}
impl std::error::Error for WriteTimeout {}
impl std::error::Error for ReadError {}

impl From<LookupError> for Error {
	fn from(other: LookupError) -> Self {
		Self::Lookup(other)
	}
}

impl From<OpenError> for Error {
	fn from(other: OpenError) -> Self {
		Self::Open(other)
	}
}

impl From<ConfigureError> for Error {
	fn from(other: ConfigureError) -> Self {
		Self::Configure(other)
	}
}

impl From<InputTooLarge> for Error {
	fn from(other: InputTooLarge) -> Self {
		Self::InputTooLarge(other)
	}
}

impl From<WriteError> for Error {
	fn from(other: WriteError) -> Self {
		Self::Write(other)
	}
}

impl From<WriteTimeout> for Error {
	fn from(other: WriteTimeout) -> Self {
		Self::Write(other.into())
	}
}

impl From<ReadError> for Error {
	fn from(other: ReadError) -> Self {
		Self::Read(other)
	}
}

impl From<WriteTimeout> for WriteError {
	fn from(other: WriteTimeout) -> Self {
		Self::Timeout(other)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Lookup(e) => write!(f, "{}", e),
			Self::Open(e) => write!(f, "{}", e),
			Self::Configure(e) => write!(f, "{}", e),
			Self::Input(e) => write!(f, "failed to read from stdin: {}", cause(e)),
			Self::InputTooLarge(e) => write!(f, "{}", e),
			Self::Write(e) => write!(f, "{}", e),
			Self::Read(e) => write!(f, "{}", e),
			Self::Output(e) => write!(f, "failed to write to stdout: {}", cause(e)),
		}
	}
}

impl std::fmt::Display for LookupError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "failed to get port by name '{}': {}", self.device.display(), cause(&self.cause))
	}
}

impl std::fmt::Display for OpenError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "failed to open port '{}': {}", self.device.display(), cause(&self.cause))
	}
}

impl std::fmt::Display for ConfigureError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "failed to set {}: {}", self.parameter, cause(&self.cause))?;
		if let Some((first, rest)) = self.applied.split_first() {
			write!(f, " (already applied: {}", first)?;
			for parameter in rest {
				write!(f, ", {}", parameter)?;
			}
			write!(f, ")")?;
		}
		Ok(())
	}
}

impl std::fmt::Display for InputTooLarge {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "stdin exceeded internal buffer ({} bytes)", self.limit)
	}
}

impl std::fmt::Display for WriteError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Io(e) => write!(f, "failed to write to serial port: {}", cause(e)),
			Self::Timeout(e) => write!(f, "{}", e),
		}
	}
}

impl std::fmt::Display for WriteTimeout {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"timed out while writing to serial port: {} of {} bytes written",
			self.written, self.requested
		)
	}
}

impl std::fmt::Display for ReadError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Io(e) => write!(f, "failed to read from serial port: {}", cause(e)),
			Self::Timeout => write!(f, "timed out while reading from serial port"),
		}
	}
}
