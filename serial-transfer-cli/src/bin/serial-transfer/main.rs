mod logging;
mod options;
mod signal;

use options::Options;

fn main() {
	if let Err(()) = do_main(clap::Parser::parse()) {
		std::process::exit(-1);
	}
}

fn do_main(options: Options) -> Result<(), ()> {
	logging::init(module_path!(), options.verbose);
	if let Some(shell) = options.shell_completion {
		return write_shell_completion(shell);
	}

	let config = options.config();
	let stop = signal::install()?;
	log::debug!(
		"Using serial port {} with baud rate {}",
		config.device.display(),
		config.baud_rate
	);
	match config.read_timeout {
		Some(timeout) => log::debug!("Giving up after {:?} without data", timeout),
		None => log::debug!("Waiting for data until interrupted"),
	}

	let stdout = std::io::stdout();
	let mut output = stdout.lock();
	serial_transfer::run(
		&mut serial_transfer::Serial2Backend,
		&config,
		&mut serial_transfer::Stdin::new(),
		&mut output,
		stop,
	)
	.map_err(|e| log::error!("{}", e))?;

	log::info!("Interrupted, serial port closed");
	Ok(())
}

fn write_shell_completion(shell: clap_complete::Shell) -> Result<(), ()> {
	use clap::CommandFactory;
	use std::io::Write;

	let mut buffer = Vec::with_capacity(4 * 1024);

	let mut command = Options::command();
	clap_complete::generate(shell, &mut command, env!("CARGO_BIN_NAME"), &mut buffer);
	if !buffer.ends_with(b"\n") {
		buffer.push(b'\n');
	}

	log::debug!("Writing shell completion for {} to stdout", shell);
	std::io::stdout()
		.lock()
		.write_all(&buffer)
		.map_err(|e| log::error!("Failed to write to stdout: {}", e))
}
