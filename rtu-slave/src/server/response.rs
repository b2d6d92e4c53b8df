use crate::common::serialize::{calc_bytes_for_bits, calc_bytes_for_registers};
use crate::common::traits::Serialize;
use crate::decode::AppDecodeLevel;
use crate::error::RequestError;
use crate::types::{AddressRange, Indexed};

use scursor::WriteCursor;

/// Packs a slice of bits low bit first, preceded by the byte count
pub(crate) struct BitWriter<'a> {
    start: u16,
    values: &'a [bool],
}

/// Writes a slice of registers as big-endian words, preceded by the byte count
pub(crate) struct RegisterWriter<'a> {
    start: u16,
    values: &'a [u16],
}

impl<'a> BitWriter<'a> {
    pub(crate) fn new(start: u16, values: &'a [bool]) -> Self {
        Self { start, values }
    }
}

impl<'a> RegisterWriter<'a> {
    pub(crate) fn new(start: u16, values: &'a [u16]) -> Self {
        Self { start, values }
    }
}

impl Serialize for BitWriter<'_> {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), RequestError> {
        // write the number of bytes that follow
        let num_bytes = calc_bytes_for_bits(self.values.len())?;
        cursor.write_u8(num_bytes)?;

        let mut acc: u8 = 0;
        let mut num_bits: usize = 0;

        for value in self.values {
            if *value {
                // merge the bit into the byte
                acc |= 1 << num_bits;
            }
            num_bits += 1;
            if num_bits == 8 {
                cursor.write_u8(acc)?;
                acc = 0;
                num_bits = 0;
            }
        }

        // unused high bits of the last byte stay zero
        if num_bits > 0 {
            cursor.write_u8(acc)?;
        }

        Ok(())
    }
}

impl Serialize for RegisterWriter<'_> {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), RequestError> {
        let num_bytes = calc_bytes_for_registers(self.values.len())?;
        cursor.write_u8(num_bytes)?;

        for value in self.values {
            cursor.write_u16_be(*value)?;
        }

        Ok(())
    }
}

/// Body of a normal reply
pub(crate) enum Reply<'a> {
    /// read coils and read discrete inputs
    Bits(BitWriter<'a>),
    /// read holding registers and read input registers
    Registers(RegisterWriter<'a>),
    /// write single coil and write single register echo the request
    Echo(Indexed<u16>),
    /// multi-writes echo the address and quantity
    Written(AddressRange),
}

impl Serialize for Reply<'_> {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), RequestError> {
        match self {
            Reply::Bits(x) => x.serialize(cursor),
            Reply::Registers(x) => x.serialize(cursor),
            Reply::Echo(x) => x.serialize(cursor),
            Reply::Written(x) => x.serialize(cursor),
        }
    }
}

pub(crate) struct ReplyDisplay<'a, 'b> {
    reply: &'a Reply<'b>,
    level: AppDecodeLevel,
}

impl<'a, 'b> ReplyDisplay<'a, 'b> {
    pub(crate) fn new(level: AppDecodeLevel, reply: &'a Reply<'b>) -> Self {
        Self { reply, level }
    }
}

impl std::fmt::Display for ReplyDisplay<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.level.data_headers() {
            return Ok(());
        }

        match self.reply {
            Reply::Bits(x) => {
                write!(
                    f,
                    " {}",
                    AddressRange::new(x.start, x.values.len() as u16)
                )?;
                if self.level.data_values() {
                    for (offset, value) in x.values.iter().enumerate() {
                        let index = x.start.wrapping_add(offset as u16);
                        write!(f, "\n{}", Indexed::new(index, *value))?;
                    }
                }
            }
            Reply::Registers(x) => {
                write!(
                    f,
                    " {}",
                    AddressRange::new(x.start, x.values.len() as u16)
                )?;
                if self.level.data_values() {
                    for (offset, value) in x.values.iter().enumerate() {
                        let index = x.start.wrapping_add(offset as u16);
                        write!(f, "\n{}", Indexed::new(index, *value))?;
                    }
                }
            }
            Reply::Echo(x) => write!(f, " {x}")?,
            Reply::Written(x) => write!(f, " {x}")?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize(reply: &Reply) -> Vec<u8> {
        let mut buffer = [0u8; 256];
        let mut cursor = WriteCursor::new(&mut buffer);
        reply.serialize(&mut cursor).unwrap();
        let length = cursor.position();
        buffer[..length].to_vec()
    }

    #[test]
    fn packs_bits_low_order_first() {
        let values = [true, false, true, true, false, false, true, true, true, false, true];
        let bytes = serialize(&Reply::Bits(BitWriter::new(0, &values)));
        assert_eq!(bytes, vec![0x02, 0xCD, 0x05]);
    }

    #[test]
    fn ten_set_bits_leave_unused_high_bits_clear() {
        let values = [true; 10];
        let bytes = serialize(&Reply::Bits(BitWriter::new(0, &values)));
        assert_eq!(bytes, vec![0x02, 0xFF, 0x03]);
    }

    #[test]
    fn writes_registers_big_endian() {
        let values = [0x000A, 0xCAFE];
        let bytes = serialize(&Reply::Registers(RegisterWriter::new(0, &values)));
        assert_eq!(bytes, vec![0x04, 0x00, 0x0A, 0xCA, 0xFE]);
    }

    #[test]
    fn echoes_written_range() {
        let bytes = serialize(&Reply::Written(AddressRange::new(0x13, 0x0A)));
        assert_eq!(bytes, vec![0x00, 0x13, 0x00, 0x0A]);
    }

    #[test]
    fn display_respects_decode_level() {
        let values = [0x0001, 0x0002];
        let reply = Reply::Registers(RegisterWriter::new(7, &values));
        assert_eq!(
            ReplyDisplay::new(AppDecodeLevel::FunctionCode, &reply).to_string(),
            ""
        );
        assert_eq!(
            ReplyDisplay::new(AppDecodeLevel::DataHeaders, &reply).to_string(),
            " start: 0x0007 qty: 2"
        );
        assert_eq!(
            ReplyDisplay::new(AppDecodeLevel::DataValues, &reply).to_string(),
            " start: 0x0007 qty: 2\nidx: 0x0007 value: 0x0001\nidx: 0x0008 value: 0x0002"
        );
    }
}
