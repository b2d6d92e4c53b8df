pub(crate) mod frame;

pub use frame::CrcMode;

#[cfg(feature = "serial")]
pub use serialport::{DataBits, FlowControl, Parity, StopBits};
#[cfg(feature = "serial")]
use std::time::Duration;

/// Serial port settings
#[cfg(feature = "serial")]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SerialSettings {
    /// Baud rate of the port
    pub baud_rate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Types of flow control
    pub flow_control: FlowControl,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Parity setting
    pub parity: Parity,
    /// How long a read waits for the rest of a frame before returning what it has
    pub read_timeout: Duration,
}

#[cfg(feature = "serial")]
impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            flow_control: FlowControl::None,
            stop_bits: StopBits::One,
            parity: Parity::None,
            read_timeout: Duration::from_millis(15),
        }
    }
}

/// A serial port used as the physical layer of a slave
#[cfg(feature = "serial")]
pub struct SerialPort {
    inner: Box<dyn serialport::SerialPort>,
}

#[cfg(feature = "serial")]
impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.inner.name() {
            Some(name) => write!(f, "SerialPort({name})"),
            None => f.write_str("SerialPort"),
        }
    }
}

#[cfg(feature = "serial")]
impl SerialPort {
    /// Open the named port (e.g. `/dev/ttyUSB0` or `COM3`) with the given settings
    pub fn open(path: &str, settings: SerialSettings) -> std::io::Result<Self> {
        let inner = serialport::new(path, settings.baud_rate)
            .data_bits(settings.data_bits)
            .flow_control(settings.flow_control)
            .stop_bits(settings.stop_bits)
            .parity(settings.parity)
            .timeout(settings.read_timeout)
            .open()?;

        tracing::info!("opened port {} at {} baud", path, settings.baud_rate);

        Ok(Self { inner })
    }
}

#[cfg(feature = "serial")]
impl crate::phys::PhysLayer for SerialPort {
    fn bytes_available(&mut self) -> std::io::Result<usize> {
        Ok(self.inner.bytes_to_read()? as usize)
    }

    fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize> {
        let mut count = 0;
        // keep reading until the buffer is full or the line goes quiet
        while count < buffer.len() {
            match std::io::Read::read(&mut self.inner, &mut buffer[count..]) {
                Ok(0) => break,
                Ok(n) => count += n,
                Err(err) if err.kind() == std::io::ErrorKind::TimedOut => break,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        std::io::Write::write_all(&mut self.inner, data)?;
        std::io::Write::flush(&mut self.inner)
    }

    fn discard_input(&mut self) -> std::io::Result<()> {
        self.inner.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }
}
