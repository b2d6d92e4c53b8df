use crate::decode::PhysDecodeLevel;
use crate::phys::PhysLayer;
use std::fmt::Write;

pub(crate) fn read(
    phys: &mut dyn PhysLayer,
    buffer: &mut [u8],
    decode_level: PhysDecodeLevel,
) -> Result<usize, std::io::Error> {
    let length = phys.read(buffer)?.min(buffer.len());

    if decode_level.enabled() {
        if let Some(x) = buffer.get(0..length) {
            tracing::info!("PHYS RX - {}", PhysDisplay::new(decode_level, x))
        }
    }

    Ok(length)
}

pub(crate) fn write(
    phys: &mut dyn PhysLayer,
    data: &[u8],
    decode_level: PhysDecodeLevel,
) -> Result<(), std::io::Error> {
    if decode_level.enabled() {
        tracing::info!("PHYS TX - {}", PhysDisplay::new(decode_level, data));
    }

    phys.write(data)
}

pub(crate) struct PhysDisplay<'a> {
    level: PhysDecodeLevel,
    data: &'a [u8],
}

impl<'a> PhysDisplay<'a> {
    pub(crate) fn new(level: PhysDecodeLevel, data: &'a [u8]) -> Self {
        PhysDisplay { level, data }
    }
}

impl<'a> std::fmt::Display for PhysDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} bytes", self.data.len())?;
        if self.level.data_enabled() {
            format_bytes(f, self.data)?;
        }
        Ok(())
    }
}

const BYTES_PER_DECODE_LINE: usize = 18;

pub(crate) fn format_bytes(f: &mut std::fmt::Formatter, bytes: &[u8]) -> std::fmt::Result {
    for chunk in bytes.chunks(BYTES_PER_DECODE_LINE) {
        writeln!(f)?;
        let mut first = true;
        for byte in chunk {
            if !first {
                f.write_char(' ')?;
            }
            first = false;
            write!(f, "{byte:02X?}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_length_only() {
        let display = PhysDisplay::new(PhysDecodeLevel::Length, &[0x01, 0x02, 0x03]);
        assert_eq!(display.to_string(), "3 bytes");
    }

    #[test]
    fn formats_data_as_hex() {
        let display = PhysDisplay::new(PhysDecodeLevel::Data, &[0x01, 0xAB]);
        assert_eq!(display.to_string(), "2 bytes\n01 AB");
    }
}
