use crate::error::{AduParseError, RequestError};

use scursor::{ReadCursor, WriteCursor};

pub(crate) trait Serialize {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), RequestError>;
}

pub(crate) trait Parse: Sized {
    fn parse(cursor: &mut ReadCursor) -> Result<Self, AduParseError>;
}
