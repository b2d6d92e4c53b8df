//! A synchronous implementation of the slave side of [Modbus](http://modbus.org/) RTU.
//!
//! # Features
//!
//! * Panic-free parsing of every inbound frame
//! * CRC-16 validation that can be disabled for links that already carry integrity checks
//! * An owned, bounds-checked address space of coils, discrete inputs, holding registers
//!   and input registers
//! * Broadcast writes executed without a reply
//! * Decoding of requests, frames and raw bytes through [`tracing`](https://docs.rs/tracing)
//!
//! # Supported Functions
//!
//! * Read Coils
//! * Read Discrete Inputs
//! * Read Holding Registers
//! * Read Input Registers
//! * Write Single Coil
//! * Write Single Register
//! * Write Multiple Coils
//! * Write Multiple Registers
//!
//! Any other function code is answered with an illegal function exception.
//!
//! # Example
//!
//! A slave with unit id 1 on a serial port, polled forever
//!
//! ```no_run
//! use rtu_slave::decode::DecodeLevel;
//! use rtu_slave::serial::{SerialPort, SerialSettings};
//! use rtu_slave::server::{AddressSpace, RtuSlave};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let port = SerialPort::open("/dev/ttyUSB0", SerialSettings::default())?;
//!     let mut slave = RtuSlave::new(1, port, DecodeLevel::default())?;
//!     let mut space = AddressSpace::with_sizes(16, 16, 32, 32);
//!
//!     loop {
//!         slave.poll(&mut space)?;
//!     }
//! }
//! ```

// internal modules
mod common;

/// Public constant values related to the Modbus protocol
pub mod constants;
/// Controls what is decoded and logged
pub mod decode;
/// Error types associated with polling the slave
pub mod error;
/// Exception codes carried by exception replies
pub mod exception;
/// The physical layer abstraction the slave reads from and writes to
pub mod phys;
/// RTU framing options and the serial port transport
pub mod serial;
/// The slave engine and its address space
pub mod server;
/// Types used in requests and replies
pub mod types;
