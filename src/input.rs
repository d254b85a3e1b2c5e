//! Non-blocking readiness check for the data to send.

/// A source of bytes to write to the serial port.
pub trait Input {
	/// Check if data can be read without blocking.
	///
	/// This must return immediately. End of input also counts as ready.
	fn is_ready(&mut self) -> std::io::Result<bool>;

	/// Read available data into the buffer.
	fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize>;
}

/// The standard input of the process.
#[derive(Debug)]
pub struct Stdin {
	stdin: std::io::Stdin,
}

impl Stdin {
	pub fn new() -> Self {
		Self { stdin: std::io::stdin() }
	}
}

impl Default for Stdin {
	fn default() -> Self {
		Self::new()
	}
}

impl Input for Stdin {
	#[cfg(unix)]
	fn is_ready(&mut self) -> std::io::Result<bool> {
		use std::os::unix::io::AsRawFd;
		poll_readable(self.stdin.as_raw_fd())
	}

	// Without a zero-timeout poll, assume data is waiting if stdin is piped or redirected.
	#[cfg(not(unix))]
	fn is_ready(&mut self) -> std::io::Result<bool> {
		use std::io::IsTerminal;
		Ok(!self.stdin.is_terminal())
	}

	fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize> {
		use std::io::Read;
		loop {
			match self.stdin.read(buffer) {
				Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
				result => return result,
			}
		}
	}
}

/// Poll a file descriptor for readability with a zero timeout.
#[cfg(unix)]
fn poll_readable(fd: std::os::unix::io::RawFd) -> std::io::Result<bool> {
	let mut poll_fd = libc::pollfd {
		fd,
		events: libc::POLLIN,
		revents: 0,
	};
	loop {
		// SAFETY: `poll_fd` is a valid pollfd and we pass a count of exactly one.
		let ready = unsafe { libc::poll(&mut poll_fd, 1, 0) };
		if ready < 0 {
			let error = std::io::Error::last_os_error();
			if error.kind() == std::io::ErrorKind::Interrupted {
				continue;
			}
			return Err(error);
		}
		return Ok(ready > 0 && poll_fd.revents & (libc::POLLIN | libc::POLLHUP) != 0);
	}
}

#[cfg(all(test, unix))]
mod test {
	use super::*;
	use assert2::{assert, let_assert};
	use std::os::unix::io::RawFd;

	fn pipe() -> (RawFd, RawFd) {
		let mut fds = [0; 2];
		// SAFETY: `fds` has room for the two file descriptors written by pipe().
		assert!(unsafe { libc::pipe(fds.as_mut_ptr()) } == 0);
		(fds[0], fds[1])
	}

	fn close(fd: RawFd) {
		// SAFETY: the file descriptor was opened by the test and is closed only once.
		unsafe { libc::close(fd) };
	}

	#[test]
	fn empty_pipe_is_not_ready() {
		let (read, write) = pipe();
		let_assert!(Ok(ready) = poll_readable(read));
		assert!(!ready);
		close(read);
		close(write);
	}

	#[test]
	fn pipe_with_data_is_ready() {
		let (read, write) = pipe();
		// SAFETY: writing from a valid buffer to a pipe we own.
		assert!(unsafe { libc::write(write, b"hello".as_ptr().cast(), 5) } == 5);
		let_assert!(Ok(ready) = poll_readable(read));
		assert!(ready);
		close(read);
		close(write);
	}

	#[test]
	fn closed_pipe_is_ready() {
		let (read, write) = pipe();
		close(write);
		let_assert!(Ok(ready) = poll_readable(read));
		assert!(ready);
		close(read);
	}
}
