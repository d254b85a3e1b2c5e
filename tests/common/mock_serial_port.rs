use serial_transfer::serial2::{CharSize, FlowControl, Parity, StopBits};
use serial_transfer::{Backend, Input, Parameter, SerialPort};
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call made to the mock backend or one of its ports.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Call {
	Lookup(PathBuf),
	Open(PathBuf),
	SetBaudRate(u32),
	SetCharSize(CharSize),
	SetParity(Parity),
	SetStopBits(StopBits),
	SetFlowControl(FlowControl),
	Write(Vec<u8>),
	Read,
	Close,
}

/// Scripted result of a read call.
#[derive(Debug, Clone)]
pub enum ReadResult {
	Data(Vec<u8>),
	Empty,
	Timeout,
	Error(ErrorKind),
	/// Raise the stop flag and report a timeout, like a signal arriving during a blocking read.
	Stop,
}

/// Backend that records all calls and plays back scripted results.
///
/// Once the read script is exhausted, reads behave like an idle port and time out.
#[derive(Default)]
pub struct MockBackend {
	pub calls: Arc<Mutex<Vec<Call>>>,
	pub stop: Arc<AtomicBool>,
	pub lookup_error: Option<ErrorKind>,
	pub open_error: Option<ErrorKind>,
	pub parameter_error: Option<(Parameter, ErrorKind)>,
	pub write_error: Option<ErrorKind>,
	pub write_limit: Option<usize>,
	pub reads: VecDeque<ReadResult>,
}

pub struct MockSerialPort {
	calls: Arc<Mutex<Vec<Call>>>,
	stop: Arc<AtomicBool>,
	parameter_error: Option<(Parameter, ErrorKind)>,
	write_error: Option<ErrorKind>,
	write_limit: Option<usize>,
	reads: VecDeque<ReadResult>,
}

impl MockBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_reads(reads: impl IntoIterator<Item = ReadResult>) -> Self {
		Self {
			reads: reads.into_iter().collect(),
			..Self::default()
		}
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	pub fn writes(&self) -> Vec<Vec<u8>> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				Call::Write(data) => Some(data),
				_ => None,
			})
			.collect()
	}

	pub fn count(&self, call: &Call) -> usize {
		self.calls().iter().filter(|c| *c == call).count()
	}

	fn record(&self, call: Call) {
		self.calls.lock().unwrap().push(call);
	}
}

impl Backend for MockBackend {
	type Port = MockSerialPort;

	fn lookup(&mut self, name: &Path) -> std::io::Result<PathBuf> {
		self.record(Call::Lookup(name.to_path_buf()));
		match self.lookup_error {
			Some(kind) => Err(kind.into()),
			None => Ok(name.to_path_buf()),
		}
	}

	fn open(&mut self, path: &Path) -> std::io::Result<Self::Port> {
		self.record(Call::Open(path.to_path_buf()));
		if let Some(kind) = self.open_error {
			return Err(kind.into());
		}
		Ok(MockSerialPort {
			calls: self.calls.clone(),
			stop: self.stop.clone(),
			parameter_error: self.parameter_error,
			write_error: self.write_error,
			write_limit: self.write_limit,
			reads: std::mem::take(&mut self.reads),
		})
	}
}

impl MockSerialPort {
	fn record(&self, call: Call) {
		self.calls.lock().unwrap().push(call);
	}

	fn set(&mut self, parameter: Parameter, call: Call) -> std::io::Result<()> {
		self.record(call);
		match self.parameter_error {
			Some((failing, kind)) if failing == parameter => Err(kind.into()),
			_ => Ok(()),
		}
	}
}

impl SerialPort for MockSerialPort {
	fn set_baud_rate(&mut self, baud_rate: u32) -> std::io::Result<()> {
		self.set(Parameter::BaudRate, Call::SetBaudRate(baud_rate))
	}

	fn set_char_size(&mut self, char_size: CharSize) -> std::io::Result<()> {
		self.set(Parameter::CharSize, Call::SetCharSize(char_size))
	}

	fn set_parity(&mut self, parity: Parity) -> std::io::Result<()> {
		self.set(Parameter::Parity, Call::SetParity(parity))
	}

	fn set_stop_bits(&mut self, stop_bits: StopBits) -> std::io::Result<()> {
		self.set(Parameter::StopBits, Call::SetStopBits(stop_bits))
	}

	fn set_flow_control(&mut self, flow_control: FlowControl) -> std::io::Result<()> {
		self.set(Parameter::FlowControl, Call::SetFlowControl(flow_control))
	}

	fn write(&mut self, buffer: &[u8], _timeout: Duration) -> std::io::Result<usize> {
		self.record(Call::Write(buffer.to_vec()));
		if let Some(kind) = self.write_error {
			return Err(kind.into());
		}
		Ok(buffer.len().min(self.write_limit.unwrap_or(usize::MAX)))
	}

	fn read(&mut self, buffer: &mut [u8], timeout: Duration) -> std::io::Result<usize> {
		self.record(Call::Read);
		match self.reads.pop_front() {
			Some(ReadResult::Data(data)) => {
				assert!(data.len() <= buffer.len(), "read buffer is too small");
				buffer[..data.len()].copy_from_slice(&data);
				Ok(data.len())
			},
			Some(ReadResult::Empty) => Ok(0),
			Some(ReadResult::Timeout) => Err(ErrorKind::TimedOut.into()),
			Some(ReadResult::Error(kind)) => Err(kind.into()),
			Some(ReadResult::Stop) => {
				self.stop.store(true, Ordering::Relaxed);
				Err(ErrorKind::TimedOut.into())
			},
			None => {
				std::thread::sleep(timeout);
				Err(ErrorKind::TimedOut.into())
			},
		}
	}
}

impl Drop for MockSerialPort {
	fn drop(&mut self) {
		self.record(Call::Close);
	}
}

/// Scripted standard input.
pub struct MockInput {
	pub ready: bool,
	pub data: Vec<u8>,
	pub error: Option<ErrorKind>,
}

impl MockInput {
	pub fn empty() -> Self {
		Self {
			ready: false,
			data: Vec::new(),
			error: None,
		}
	}

	pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
		Self {
			ready: true,
			data: data.into(),
			error: None,
		}
	}
}

impl Input for MockInput {
	fn is_ready(&mut self) -> std::io::Result<bool> {
		Ok(self.ready)
	}

	fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize> {
		if let Some(kind) = self.error {
			return Err(kind.into());
		}
		let len = buffer.len().min(self.data.len());
		buffer[..len].copy_from_slice(&self.data[..len]);
		self.data.drain(..len);
		Ok(len)
	}
}
