//! Configure a serial port and perform a single bidirectional transfer.
//!
//! The transfer optionally writes the bytes waiting on an [`Input`] to the port,
//! and then echoes everything received from the port to an output stream.
//! See [`run()`] for the exact sequence of operations.
//!
//! The serial port itself is abstracted behind the [`SerialPort`] and [`Backend`] traits.
//! The [`Serial2Backend`] uses the [`serial2`] crate to talk to real hardware.

mod error;
mod input;
mod serial_port;
mod settings;
mod transfer;

pub use error::*;
pub use input::{Input, Stdin};
pub use serial_port::{Backend, SerialPort, Serial2Backend};
pub use settings::{LinkSettings, Parameter};
pub use transfer::{run, Config, BUFFER_SIZE, WRITE_TIMEOUT};

/// Re-exported `serial2` crate for the line setting types used by [`SerialPort`].
pub use serial2;
