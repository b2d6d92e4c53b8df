use crate::common::traits::Parse;
use crate::error::AduParseError;
use crate::types::{AddressRange, Indexed};

use scursor::ReadCursor;

impl Parse for AddressRange {
    fn parse(cursor: &mut ReadCursor) -> Result<Self, AduParseError> {
        Ok(AddressRange::new(cursor.read_u16_be()?, cursor.read_u16_be()?))
    }
}

impl Parse for Indexed<u16> {
    fn parse(cursor: &mut ReadCursor) -> Result<Self, AduParseError> {
        Ok(Indexed::new(cursor.read_u16_be()?, cursor.read_u16_be()?))
    }
}
