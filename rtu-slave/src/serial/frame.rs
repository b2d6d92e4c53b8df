use crate::common::bits::to_word;
use crate::common::crc::{crc, crc_bytes};
use crate::common::function::FunctionField;
use crate::common::traits::Serialize;
use crate::decode::FrameDecodeLevel;
use crate::error::{FrameError, InternalError, RequestError};
use crate::types::UnitId;

use scursor::WriteCursor;

pub(crate) mod constants {
    pub(crate) const HEADER_LENGTH: usize = 1;
    pub(crate) const FUNCTION_CODE_LENGTH: usize = 1;
    pub(crate) const CRC_LENGTH: usize = 2;
    /// maximum size of an RTU frame on a serial line, CRC included
    pub(crate) const MAX_FRAME_LENGTH: usize = 256;
}

/// Controls whether the trailing CRC is verified on requests and appended to replies
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CrcMode {
    /// Requests must end in a valid CRC and replies carry one
    #[default]
    Enabled,
    /// Requests carry no CRC and replies are sent without one
    Disabled,
}

impl CrcMode {
    fn enabled(self) -> bool {
        matches!(self, CrcMode::Enabled)
    }
}

/// A request frame that passed structural validation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct RequestFrame<'a> {
    pub(crate) destination: UnitId,
    pub(crate) function: u8,
    /// everything after the function code, CRC excluded
    pub(crate) body: &'a [u8],
}

impl<'a> RequestFrame<'a> {
    /// length of the frame from the unit id through the body, CRC excluded
    pub(crate) fn len(&self) -> usize {
        constants::HEADER_LENGTH + constants::FUNCTION_CODE_LENGTH + self.body.len()
    }
}

/// Checks length, CRC and destination of a complete inbound frame
///
/// Every error is a silent drop: the frame is noise or belongs to another unit.
pub(crate) fn parse_request(
    bytes: &[u8],
    unit_id: UnitId,
    mode: CrcMode,
    decode_level: FrameDecodeLevel,
) -> Result<RequestFrame<'_>, FrameError> {
    let min_length = constants::HEADER_LENGTH
        + constants::FUNCTION_CODE_LENGTH
        + if mode.enabled() {
            constants::CRC_LENGTH
        } else {
            0
        };

    if bytes.len() < min_length {
        return Err(FrameError::TooShort(bytes.len()));
    }

    let (data, received_crc) = if mode.enabled() {
        let (data, trailer) = bytes.split_at(bytes.len() - constants::CRC_LENGTH);
        let received = to_word(trailer[1], trailer[0]);
        let expected = crc(data);
        if received != expected {
            return Err(FrameError::CrcMismatch { received, expected });
        }
        (data, Some(received))
    } else {
        (bytes, None)
    };

    let destination = UnitId::new(data[0]);

    if decode_level.enabled() {
        tracing::info!(
            "RTU RX - {}",
            RtuDisplay::new(decode_level, destination, &data[1..], received_crc)
        );
    }

    if destination != unit_id && !destination.is_broadcast() {
        return Err(FrameError::NotForThisUnit(destination));
    }

    Ok(RequestFrame {
        destination,
        function: data[1],
        body: &data[2..],
    })
}

/// Formats replies into a fixed buffer sized for the largest RTU frame
pub(crate) struct FrameWriter {
    buffer: [u8; constants::MAX_FRAME_LENGTH],
}

impl FrameWriter {
    pub(crate) fn new() -> Self {
        Self {
            buffer: [0; constants::MAX_FRAME_LENGTH],
        }
    }

    /// unit id + function field + body, followed by the CRC when enabled
    pub(crate) fn format(
        &mut self,
        unit_id: UnitId,
        function: FunctionField,
        body: &dyn Serialize,
        mode: CrcMode,
        decode_level: FrameDecodeLevel,
    ) -> Result<&[u8], RequestError> {
        let end = {
            let mut cursor = WriteCursor::new(&mut self.buffer);
            cursor.write_u8(unit_id.value)?;
            cursor.write_u8(function.get_value())?;
            body.serialize(&mut cursor)?;
            let end_pdu = cursor.position();
            let pdu_crc = match cursor.get(0..end_pdu) {
                Some(data) => crc(data),
                None => return Err(InternalError::BadWrite.into()),
            };
            if mode.enabled() {
                for byte in crc_bytes(pdu_crc) {
                    cursor.write_u8(byte)?;
                }
            }

            if decode_level.enabled() {
                if let Some(payload) = cursor.get(1..end_pdu) {
                    tracing::info!(
                        "RTU TX - {}",
                        RtuDisplay::new(
                            decode_level,
                            unit_id,
                            payload,
                            mode.enabled().then_some(pdu_crc)
                        )
                    );
                }
            }

            cursor.position()
        };

        self.buffer
            .get(..end)
            .ok_or_else(|| InternalError::BadWrite.into())
    }
}

pub(crate) struct RtuDisplay<'a> {
    level: FrameDecodeLevel,
    destination: UnitId,
    payload: &'a [u8],
    crc: Option<u16>,
}

impl<'a> RtuDisplay<'a> {
    pub(crate) fn new(
        level: FrameDecodeLevel,
        destination: UnitId,
        payload: &'a [u8],
        crc: Option<u16>,
    ) -> Self {
        RtuDisplay {
            level,
            destination,
            payload,
            crc,
        }
    }
}

impl<'a> std::fmt::Display for RtuDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "dest: {}", self.destination)?;
        if let Some(crc) = self.crc {
            write!(f, " crc: {crc:#06X}")?;
        }
        write!(f, " (payload len = {})", self.payload.len())?;
        if self.level.payload_enabled() {
            crate::common::phys::format_bytes(f, self.payload)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::common::function::FunctionCode;
    use crate::exception::ExceptionCode;
    use crate::types::AddressRange;

    use super::*;

    const UNIT_ID: u8 = 0x2A;

    const READ_COILS_REQUEST: &[u8] = &[
        UNIT_ID, // unit id
        0x01,    // function code
        0x00, 0x10, // starting address
        0x00, 0x13, // qty of outputs
        0x7A, 0x19, // crc
    ];

    const WRITE_MULTIPLE_REGISTERS_REQUEST: &[u8] = &[
        UNIT_ID, // unit id
        0x10,    // function code
        0x00, 0x10, // starting address
        0x00, 0x02, // qty of outputs
        0x04, // byte count
        0x12, 0x34, 0x56, 0x78, // output values
        0x07, 0x73, // crc
    ];

    const WRITE_MULTIPLE_REGISTERS_RESPONSE: &[u8] = &[
        UNIT_ID, // unit id
        0x10,    // function code
        0x00, 0x10, // starting address
        0x00, 0x02, // qty of outputs
        0x46, 0x16, // crc
    ];

    fn parse(bytes: &[u8]) -> Result<RequestFrame<'_>, FrameError> {
        parse_request(
            bytes,
            UnitId::new(UNIT_ID),
            CrcMode::Enabled,
            FrameDecodeLevel::Nothing,
        )
    }

    #[test]
    fn can_parse_request_frames() {
        let frame = parse(READ_COILS_REQUEST).unwrap();
        assert_eq!(frame.destination, UnitId::new(UNIT_ID));
        assert_eq!(frame.function, 0x01);
        assert_eq!(frame.body, &[0x00, 0x10, 0x00, 0x13]);
        assert_eq!(frame.len(), 6);

        let frame = parse(WRITE_MULTIPLE_REGISTERS_REQUEST).unwrap();
        assert_eq!(frame.function, 0x10);
        assert_eq!(frame.len(), 11);
    }

    #[test]
    fn fails_on_wrong_crc() {
        const READ_COILS_REQUEST_WRONG_CRC: &[u8] = &[
            UNIT_ID, // unit id
            0x01,    // function code
            0x00, 0x10, // starting address
            0x00, 0x13, // qty of outputs
            0xFF, 0xFF, // wrong crc
        ];

        assert_eq!(
            parse(READ_COILS_REQUEST_WRONG_CRC),
            Err(FrameError::CrcMismatch {
                received: 0xFFFF,
                expected: 0x197A
            })
        );
    }

    #[test]
    fn crc_is_read_low_byte_first() {
        // same frame with the CRC bytes swapped
        let mut swapped = READ_COILS_REQUEST.to_vec();
        swapped.swap(6, 7);
        assert!(matches!(
            parse(&swapped),
            Err(FrameError::CrcMismatch { .. })
        ));
    }

    #[test]
    fn rejects_short_frames() {
        assert_eq!(parse(&[UNIT_ID, 0x01, 0x00]), Err(FrameError::TooShort(3)));
        assert_eq!(parse(&[]), Err(FrameError::TooShort(0)));
    }

    #[test]
    fn disabled_crc_only_needs_id_and_function() {
        let frame = parse_request(
            &[UNIT_ID, 0x03],
            UnitId::new(UNIT_ID),
            CrcMode::Disabled,
            FrameDecodeLevel::Nothing,
        )
        .unwrap();
        assert_eq!(frame.function, 0x03);
        assert!(frame.body.is_empty());

        assert_eq!(
            parse_request(
                &[UNIT_ID],
                UnitId::new(UNIT_ID),
                CrcMode::Disabled,
                FrameDecodeLevel::Nothing,
            ),
            Err(FrameError::TooShort(1))
        );
    }

    #[test]
    fn disabled_crc_keeps_trailing_bytes_in_body() {
        let frame = parse_request(
            READ_COILS_REQUEST,
            UnitId::new(UNIT_ID),
            CrcMode::Disabled,
            FrameDecodeLevel::Nothing,
        )
        .unwrap();
        assert_eq!(frame.len(), READ_COILS_REQUEST.len());
    }

    #[test]
    fn drops_frames_for_other_units() {
        assert_eq!(
            parse_request(
                READ_COILS_REQUEST,
                UnitId::new(0x01),
                CrcMode::Enabled,
                FrameDecodeLevel::Nothing,
            ),
            Err(FrameError::NotForThisUnit(UnitId::new(UNIT_ID)))
        );
    }

    #[test]
    fn accepts_broadcast_frames() {
        let mut request = vec![0x00, 0x06, 0x00, 0x01, 0x00, 0x03];
        request.extend_from_slice(&crc_bytes(crc(&request)));
        let frame = parse(&request).unwrap();
        assert!(frame.destination.is_broadcast());
    }

    #[test]
    fn can_format_reply_frames() {
        let mut writer = FrameWriter::new();
        let reply = writer
            .format(
                UnitId::new(UNIT_ID),
                FunctionField::Valid(FunctionCode::WriteMultipleRegisters),
                &AddressRange::new(0x10, 2),
                CrcMode::Enabled,
                FrameDecodeLevel::Nothing,
            )
            .unwrap();
        assert_eq!(reply, WRITE_MULTIPLE_REGISTERS_RESPONSE);
    }

    #[test]
    fn omits_crc_when_disabled() {
        let mut writer = FrameWriter::new();
        let reply = writer
            .format(
                UnitId::new(UNIT_ID),
                FunctionField::Exception(FunctionCode::ReadCoils),
                &ExceptionCode::IllegalDataAddress,
                CrcMode::Disabled,
                FrameDecodeLevel::Nothing,
            )
            .unwrap();
        assert_eq!(reply, &[UNIT_ID, 0x81, 0x02]);
    }
}
