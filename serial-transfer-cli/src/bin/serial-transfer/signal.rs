//! Stop the transfer gracefully on SIGINT and SIGTERM.

use std::sync::atomic::AtomicBool;

static STOP: AtomicBool = AtomicBool::new(false);

/// Install the signal handlers and return the flag they raise.
///
/// The handlers stay installed after the first delivery.
/// On platforms without POSIX signals no handler is installed and the flag is never raised.
pub fn install() -> Result<&'static AtomicBool, ()> {
	#[cfg(unix)]
	{
		for signal in [libc::SIGINT, libc::SIGTERM] {
			install_handler(signal)
				.map_err(|e| log::error!("Failed to install handler for signal {}: {}", signal, e))?;
		}
	}
	Ok(&STOP)
}

#[cfg(unix)]
fn install_handler(signal: libc::c_int) -> std::io::Result<()> {
	// SAFETY: an all-zero sigaction is valid, and the handler only stores to an atomic, which is async-signal-safe.
	unsafe {
		let mut action: libc::sigaction = std::mem::zeroed();
		action.sa_sigaction = handle_signal as libc::sighandler_t;
		// Stays installed (no SA_RESETHAND), interrupts blocking calls (no SA_RESTART).
		action.sa_flags = 0;
		libc::sigemptyset(&mut action.sa_mask);
		if libc::sigaction(signal, &action, std::ptr::null_mut()) != 0 {
			return Err(std::io::Error::last_os_error());
		}
	}
	Ok(())
}

#[cfg(unix)]
extern "C" fn handle_signal(_signal: libc::c_int) {
	STOP.store(true, std::sync::atomic::Ordering::Relaxed);
}
