use std::path::PathBuf;
use std::time::Duration;

/// Write stdin to a serial port and echo everything the port sends back.
///
/// If data is waiting on stdin, it is written to the serial port once.
/// The data must be smaller than 4096 bytes.
/// Afterwards, everything received from the serial port is written to stdout
/// until an error occurs or the program is interrupted.
///
/// The serial port is always configured for 8 data bits, no parity, 1 stop bit and no flow control.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub struct Options {
	/// Print progress messages to stdout.
	///
	/// Repeat to also enable debug and trace logging on stderr.
	#[arg(long, short)]
	#[arg(action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// The serial device to use.
	#[arg(long, short)]
	#[arg(value_name = "FILEPATH")]
	#[arg(default_value = serial_transfer::Config::DEFAULT_DEVICE)]
	pub device: PathBuf,

	/// The baud rate to use.
	#[arg(long, short)]
	#[arg(value_name = "RATE")]
	#[arg(default_value_t = serial_transfer::LinkSettings::DEFAULT_BAUD_RATE)]
	#[arg(value_parser = clap::value_parser!(u32).range(1..))]
	pub baudrate: u32,

	/// Give up when no data is received for this many milliseconds.
	///
	/// The default of 0 waits forever.
	#[arg(long)]
	#[arg(value_name = "MS")]
	#[arg(default_value_t = 0)]
	pub read_timeout: u64,

	/// Write a shell completion script to stdout and exit.
	#[arg(long)]
	#[arg(value_name = "SHELL")]
	pub shell_completion: Option<clap_complete::Shell>,

	/// Extra arguments are accepted and ignored.
	#[arg(hide = true)]
	pub ignored: Vec<String>,
}

impl Options {
	/// The transfer configuration described by the options.
	pub fn config(&self) -> serial_transfer::Config {
		let read_timeout = match self.read_timeout {
			0 => None,
			ms => Some(Duration::from_millis(ms)),
		};
		serial_transfer::Config {
			device: self.device.clone(),
			baud_rate: self.baudrate,
			verbose: self.verbose > 0,
			read_timeout,
		}
	}
}
