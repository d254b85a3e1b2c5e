use serial2::{CharSize, FlowControl, Parity, StopBits};

/// A single line setting of a serial port.
///
/// Each parameter is applied to the port with a separate call,
/// always in the order of [`Parameter::ALL`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Parameter {
	BaudRate,
	CharSize,
	Parity,
	StopBits,
	FlowControl,
}

impl Parameter {
	/// All parameters in the order they are applied.
	pub const ALL: [Parameter; 5] = [
		Parameter::BaudRate,
		Parameter::CharSize,
		Parameter::Parity,
		Parameter::StopBits,
		Parameter::FlowControl,
	];

	/// Human readable name of the parameter.
	pub fn name(self) -> &'static str {
		match self {
			Self::BaudRate => "baud rate",
			Self::CharSize => "bit count",
			Self::Parity => "parity",
			Self::StopBits => "stop bits",
			Self::FlowControl => "flow control",
		}
	}
}

impl std::fmt::Display for Parameter {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// The line settings applied to the serial port.
///
/// Only the baud rate is configurable from the command line,
/// the rest is fixed at 8 data bits, no parity, 1 stop bit and no flow control.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LinkSettings {
	pub baud_rate: u32,
	pub char_size: CharSize,
	pub parity: Parity,
	pub stop_bits: StopBits,
	pub flow_control: FlowControl,
}

impl LinkSettings {
	/// The default baud rate.
	pub const DEFAULT_BAUD_RATE: u32 = 115200;

	/// Create 8N1 settings without flow control for the given baud rate.
	pub fn new(baud_rate: u32) -> Self {
		Self {
			baud_rate,
			char_size: CharSize::Bits8,
			parity: Parity::None,
			stop_bits: StopBits::One,
			flow_control: FlowControl::None,
		}
	}

	/// Apply a single parameter to a serial port.
	pub fn apply<P: crate::SerialPort>(&self, port: &mut P, parameter: Parameter) -> std::io::Result<()> {
		match parameter {
			Parameter::BaudRate => port.set_baud_rate(self.baud_rate),
			Parameter::CharSize => port.set_char_size(self.char_size),
			Parameter::Parity => port.set_parity(self.parity),
			Parameter::StopBits => port.set_stop_bits(self.stop_bits),
			Parameter::FlowControl => port.set_flow_control(self.flow_control),
		}
	}
}

impl Default for LinkSettings {
	fn default() -> Self {
		Self::new(Self::DEFAULT_BAUD_RATE)
	}
}
