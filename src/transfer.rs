use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::{
	Backend,
	ConfigureError,
	Error,
	Input,
	InputTooLarge,
	LinkSettings,
	LookupError,
	OpenError,
	Parameter,
	ReadError,
	SerialPort,
	WriteError,
	WriteTimeout,
};

/// Size of the input and the read buffer.
pub const BUFFER_SIZE: usize = 4096;

/// Upper bound for writing the input to the serial port.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Maximum time a single read blocks before the stop flag is checked again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Parameters for a transfer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
	/// The serial device to use.
	pub device: PathBuf,

	/// The baud rate to configure.
	pub baud_rate: u32,

	/// Write progress messages to the output before each step.
	pub verbose: bool,

	/// Give up if no data arrives within this time.
	///
	/// With `None`, each read blocks until data arrives or the transfer is stopped.
	pub read_timeout: Option<Duration>,
}

impl Config {
	/// The serial device used if none is specified.
	#[cfg(windows)]
	pub const DEFAULT_DEVICE: &'static str = "COM1";

	/// The serial device used if none is specified.
	#[cfg(not(windows))]
	pub const DEFAULT_DEVICE: &'static str = "/dev/ttyUSB0";

	pub fn new(device: impl Into<PathBuf>, baud_rate: u32) -> Self {
		Self {
			device: device.into(),
			baud_rate,
			verbose: false,
			read_timeout: None,
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::new(Self::DEFAULT_DEVICE, LinkSettings::DEFAULT_BAUD_RATE)
	}
}

/// Perform a single transfer.
///
/// The steps are, in order:
/// * resolve and open the serial device,
/// * configure baud rate, data bits, parity, stop bits and flow control one by one,
/// * if `input` has data ready, read it once and write it to the port,
/// * echo everything read from the port to `output` until an error occurs or `stop` is raised.
///
/// The first failure aborts the transfer.
/// The serial port is closed before this function returns, whatever the result.
///
/// Returns `Ok(())` only when the transfer was stopped through the `stop` flag.
pub fn run<B, I, W>(backend: &mut B, config: &Config, input: &mut I, output: &mut W, stop: &AtomicBool) -> Result<(), Error>
where
	B: Backend + ?Sized,
	I: Input + ?Sized,
	W: Write + ?Sized,
{
	let port = open(backend, config, output)?;
	let mut transfer = Transfer { port, config, output };
	let result = transfer.run(input, stop);
	let closed = transfer.close();
	result.and(closed)
}

fn open<B, W>(backend: &mut B, config: &Config, output: &mut W) -> Result<B::Port, Error>
where
	B: Backend + ?Sized,
	W: Write + ?Sized,
{
	narrate(output, config.verbose, format_args!("Getting port by name '{}'...", config.device.display()))?;
	let path = backend.lookup(&config.device).map_err(|cause| LookupError {
		device: config.device.clone(),
		cause,
	})?;

	narrate(output, config.verbose, format_args!("Opening port '{}'...", path.display()))?;
	let port = backend.open(&path).map_err(|cause| OpenError {
		device: path.clone(),
		cause,
	})?;
	log::debug!("Opened serial port {}", path.display());
	Ok(port)
}

fn narrate<W: Write + ?Sized>(output: &mut W, verbose: bool, message: std::fmt::Arguments) -> Result<(), Error> {
	if verbose {
		writeln!(output, "{}", message).map_err(Error::Output)?;
		output.flush().map_err(Error::Output)?;
	}
	Ok(())
}

struct Transfer<'a, P, W: ?Sized> {
	port: P,
	config: &'a Config,
	output: &'a mut W,
}

impl<P, W> Transfer<'_, P, W>
where
	P: SerialPort,
	W: Write + ?Sized,
{
	fn run<I: Input + ?Sized>(&mut self, input: &mut I, stop: &AtomicBool) -> Result<(), Error> {
		self.configure()?;
		self.write_input(input)?;
		self.echo(stop)
	}

	fn progress(&mut self, message: std::fmt::Arguments) -> Result<(), Error> {
		narrate(&mut *self.output, self.config.verbose, message)
	}

	fn configure(&mut self) -> Result<(), Error> {
		let settings = LinkSettings::new(self.config.baud_rate);
		for (index, &parameter) in Parameter::ALL.iter().enumerate() {
			match parameter {
				Parameter::BaudRate => self.progress(format_args!("Setting baud rate to {}...", settings.baud_rate))?,
				_ => self.progress(format_args!("Setting {}...", parameter))?,
			}
			settings
				.apply(&mut self.port, parameter)
				.map_err(|cause| ConfigureError {
					parameter,
					applied: Parameter::ALL[..index].to_vec(),
					cause,
				})?;
		}
		log::debug!("Configured serial port: {:?}", settings);
		Ok(())
	}

	fn write_input<I: Input + ?Sized>(&mut self, input: &mut I) -> Result<(), Error> {
		if !input.is_ready().map_err(Error::Input)? {
			log::debug!("No data waiting on stdin, not writing to the serial port");
			return Ok(());
		}

		self.progress(format_args!("Reading from stdin..."))?;
		let mut buffer = [0u8; BUFFER_SIZE];
		let count = input.read(&mut buffer).map_err(Error::Input)?;
		if count == 0 {
			log::debug!("Stdin is at end of file, not writing to the serial port");
			return Ok(());
		}
		if count == buffer.len() {
			return Err(InputTooLarge { limit: BUFFER_SIZE }.into());
		}

		let config = self.config;
		let data = &buffer[..count];
		self.progress(format_args!("Got {} bytes from stdin: '{}'", count, String::from_utf8_lossy(data)))?;
		self.progress(format_args!("Writing {} bytes to port '{}'...", count, config.device.display()))?;
		log::trace!("writing to serial port: {:02X?}", data);
		let written = self.port.write(data, WRITE_TIMEOUT).map_err(WriteError::Io)?;
		if written < count {
			return Err(WriteTimeout {
				written,
				requested: count,
			}
			.into());
		}
		Ok(())
	}

	fn echo(&mut self, stop: &AtomicBool) -> Result<(), Error> {
		self.progress(format_args!("Reading from serial port..."))?;
		let mut buffer = [0u8; BUFFER_SIZE];
		while let Some(count) = self.read_next(&mut buffer, stop)? {
			let data = &buffer[..count];
			log::trace!("read from serial port: {:02X?}", data);
			self.output.write_all(data).map_err(Error::Output)?;
			self.output.flush().map_err(Error::Output)?;
		}
		log::debug!("Stop requested, ending transfer");
		Ok(())
	}

	/// Read the next batch of data.
	///
	/// Returns `Ok(None)` if the stop flag was raised before any data arrived.
	fn read_next(&mut self, buffer: &mut [u8], stop: &AtomicBool) -> Result<Option<usize>, ReadError> {
		let deadline = self.config.read_timeout.map(|timeout| Instant::now() + timeout);
		loop {
			if stop.load(Ordering::Relaxed) {
				return Ok(None);
			}

			let timeout = match deadline {
				None => POLL_INTERVAL,
				Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
					Some(remaining) if !remaining.is_zero() => remaining.min(POLL_INTERVAL),
					_ => return Err(ReadError::Timeout),
				},
			};

			match self.port.read(buffer, timeout) {
				// Without a read timeout an empty read is just a spurious wake-up.
				Ok(0) if deadline.is_none() => continue,
				Ok(0) => return Err(ReadError::Timeout),
				Ok(count) => return Ok(Some(count)),
				Err(e) if P::is_timeout_error(&e) => continue,
				Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(ReadError::Io(e)),
			}
		}
	}

	/// Close the serial port.
	///
	/// The port is dropped even if narrating fails.
	fn close(mut self) -> Result<(), Error> {
		let config = self.config;
		log::debug!("Closing serial port {}", config.device.display());
		self.progress(format_args!("Closing serial port '{}'...", config.device.display()))
	}
}
