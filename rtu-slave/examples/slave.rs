//! Modbus RTU slave on a serial port
//!
//! Holding registers and coils can be written by the master. A background thread
//! counts seconds of uptime into the first input register and toggles discrete input 0.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;

use rtu_slave::decode::{AppDecodeLevel, DecodeLevel, FrameDecodeLevel, PhysDecodeLevel};
use rtu_slave::serial::{CrcMode, SerialPort, SerialSettings};
use rtu_slave::server::{AddressSpace, PollOutcome, RtuSlave};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serial port, e.g. /dev/ttyUSB0 or COM3
    path: String,
    #[arg(short, long, default_value_t = 9600)]
    baud: u32,
    #[arg(short, long, default_value_t = 1)]
    unit_id: u8,
    /// Neither expect nor send a CRC
    #[arg(long, default_value_t = false)]
    no_crc: bool,
    /// Log raw bytes and frames in addition to decoded requests
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let decode = if args.verbose {
        DecodeLevel::new(
            AppDecodeLevel::DataValues,
            FrameDecodeLevel::Payload,
            PhysDecodeLevel::Data,
        )
    } else {
        DecodeLevel::default().application(AppDecodeLevel::DataHeaders)
    };

    let settings = SerialSettings {
        baud_rate: args.baud,
        ..SerialSettings::default()
    };
    let port = SerialPort::open(&args.path, settings)?;

    let mut slave = RtuSlave::new(args.unit_id, port, decode)?;
    if args.no_crc {
        slave.set_crc_mode(CrcMode::Disabled);
    }

    // the space is shared with the uptime thread
    let space = Arc::new(Mutex::new(AddressSpace::with_sizes(16, 8, 32, 8)));

    {
        let space = space.clone();
        std::thread::spawn(move || {
            let mut uptime: u16 = 0;
            loop {
                std::thread::sleep(Duration::from_secs(1));
                uptime = uptime.wrapping_add(1);
                let mut space = space.lock().unwrap();
                space.input_registers_mut().set(0, uptime);
                space.discrete_inputs_mut().set(0, uptime % 2 == 1);
            }
        });
    }

    tracing::info!("slave {} listening on {}", slave.unit_id(), args.path);

    loop {
        let outcome = {
            let mut space = space.lock().unwrap();
            slave.poll(&mut space)?
        };

        if outcome == PollOutcome::Idle {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
