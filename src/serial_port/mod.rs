//! [`SerialPort`] and [`Backend`] traits to support different serial port implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::serial2::{CharSize, FlowControl, Parity, StopBits};

mod serial2;

pub use self::serial2::Serial2Backend;

/// An open serial port.
///
/// Every line setting has an independent setter, so a failure half way through configuring the port
/// leaves the settings applied before it in effect.
///
/// Dropping the port must close it.
pub trait SerialPort {
	/// Set the baud rate of the serial port.
	fn set_baud_rate(&mut self, baud_rate: u32) -> std::io::Result<()>;

	/// Set the number of data bits per character.
	fn set_char_size(&mut self, char_size: CharSize) -> std::io::Result<()>;

	/// Set the parity mode.
	fn set_parity(&mut self, parity: Parity) -> std::io::Result<()>;

	/// Set the number of stop bits.
	fn set_stop_bits(&mut self, stop_bits: StopBits) -> std::io::Result<()>;

	/// Set the flow control mode.
	fn set_flow_control(&mut self, flow_control: FlowControl) -> std::io::Result<()>;

	/// Write bytes to the serial port, blocking for at most `timeout`.
	///
	/// Returns the number of bytes accepted before the timeout expired.
	/// A return value smaller than `buffer.len()` means the write timed out.
	fn write(&mut self, buffer: &[u8], timeout: Duration) -> std::io::Result<usize>;

	/// Read available bytes, blocking until at least one byte is available or the timeout expires.
	///
	/// An expired timeout is reported as an error for which [`Self::is_timeout_error()`] returns true.
	fn read(&mut self, buffer: &mut [u8], timeout: Duration) -> std::io::Result<usize>;

	/// Check if an error indicates a timeout.
	fn is_timeout_error(error: &std::io::Error) -> bool {
		error.kind() == std::io::ErrorKind::TimedOut
	}
}

/// Finds and opens serial ports.
pub trait Backend {
	/// The serial port type opened by this backend.
	type Port: SerialPort;

	/// Resolve a device name to something that can be opened.
	fn lookup(&mut self, name: &Path) -> std::io::Result<PathBuf>;

	/// Open a resolved device for reading and writing.
	///
	/// The line settings of the device are left untouched.
	fn open(&mut self, path: &Path) -> std::io::Result<Self::Port>;
}
