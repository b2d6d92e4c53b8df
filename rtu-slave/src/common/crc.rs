/// precomputes the CRC table as a constant!
const CRC: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_MODBUS);

/// Modbus CRC-16 (reflected polynomial 0xA001, initial value 0xFFFF)
///
/// The low byte of the returned value is transmitted first, so append it with
/// [`crc_bytes`] rather than as a big-endian word.
pub(crate) fn crc(bytes: &[u8]) -> u16 {
    CRC.checksum(bytes)
}

/// wire order of a CRC value: low byte, then high byte
pub(crate) fn crc_bytes(crc: u16) -> [u8; 2] {
    [
        crate::common::bits::low_byte(crc),
        crate::common::bits::high_byte(crc),
    ]
}
