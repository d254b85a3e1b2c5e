//! Trait implementations using the `serial2` crate.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serial2::{CharSize, FlowControl, Parity, StopBits};

/// Backend opening real serial ports with the `serial2` crate.
#[derive(Debug, Default, Copy, Clone)]
pub struct Serial2Backend;

impl crate::Backend for Serial2Backend {
	type Port = serial2::SerialPort;

	fn lookup(&mut self, name: &Path) -> std::io::Result<PathBuf> {
		#[cfg(unix)]
		{
			std::fs::metadata(name)?;
			Ok(name.to_path_buf())
		}

		// COM ports do not exist as regular files, so ask the OS for the list of ports instead.
		#[cfg(not(unix))]
		{
			let ports = serial2::SerialPort::available_ports()?;
			ports
				.into_iter()
				.find(|port| port.as_path() == name || port.file_name() == Some(name.as_os_str()))
				.ok_or_else(|| std::io::ErrorKind::NotFound.into())
		}
	}

	fn open(&mut self, path: &Path) -> std::io::Result<Self::Port> {
		serial2::SerialPort::open(path, |mut settings: serial2::Settings| {
			settings.set_raw();
			Ok(settings)
		})
	}
}

impl crate::SerialPort for serial2::SerialPort {
	fn set_baud_rate(&mut self, baud_rate: u32) -> std::io::Result<()> {
		let mut settings = self.get_configuration()?;
		settings.set_baud_rate(baud_rate)?;
		self.set_configuration(&settings)
	}

	fn set_char_size(&mut self, char_size: CharSize) -> std::io::Result<()> {
		let mut settings = self.get_configuration()?;
		settings.set_char_size(char_size);
		self.set_configuration(&settings)
	}

	fn set_parity(&mut self, parity: Parity) -> std::io::Result<()> {
		let mut settings = self.get_configuration()?;
		settings.set_parity(parity);
		self.set_configuration(&settings)
	}

	fn set_stop_bits(&mut self, stop_bits: StopBits) -> std::io::Result<()> {
		let mut settings = self.get_configuration()?;
		settings.set_stop_bits(stop_bits);
		self.set_configuration(&settings)
	}

	fn set_flow_control(&mut self, flow_control: FlowControl) -> std::io::Result<()> {
		let mut settings = self.get_configuration()?;
		settings.set_flow_control(flow_control);
		self.set_configuration(&settings)
	}

	fn write(&mut self, buffer: &[u8], timeout: Duration) -> std::io::Result<usize> {
		let deadline = Instant::now() + timeout;
		let mut written = 0;
		while written < buffer.len() {
			let remaining = match deadline.checked_duration_since(Instant::now()) {
				Some(remaining) if !remaining.is_zero() => remaining,
				_ => break,
			};
			self.set_write_timeout(remaining)?;
			match serial2::SerialPort::write(self, &buffer[written..]) {
				Ok(0) => break,
				Ok(count) => written += count,
				Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
				Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
				Err(e) => return Err(e),
			}
		}
		Ok(written)
	}

	fn read(&mut self, buffer: &mut [u8], timeout: Duration) -> std::io::Result<usize> {
		self.set_read_timeout(timeout)?;
		let count = serial2::SerialPort::read(self, buffer)?;
		check_hang_up(count, buffer.len())
	}
}

/// Turn end of file into an error.
///
/// An expired timeout is reported as `TimedOut`, so a zero-byte read into a non-empty buffer
/// means the other side hung up (for example an unplugged USB adapter).
fn check_hang_up(count: usize, requested: usize) -> std::io::Result<usize> {
	if count == 0 && requested > 0 {
		Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "serial port closed"))
	} else {
		Ok(count)
	}
}
