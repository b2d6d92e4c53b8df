use crate::types::UnitId;

/// Errors that stop a single poll of the slave
///
/// Malformed or unexpected frames are never reported here. They are either dropped
/// (see [`FrameError`]) or answered with an exception.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RequestError {
    /// An I/O error occurred on the physical layer
    Io(std::io::ErrorKind),
    /// Logic errors that shouldn't happen
    Internal(InternalError),
}

impl std::error::Error for RequestError {}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RequestError::Io(kind) => std::fmt::Display::fmt(&std::io::Error::from(*kind), f),
            RequestError::Internal(err) => err.fmt(f),
        }
    }
}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> Self {
        RequestError::Io(err.kind())
    }
}

impl From<InternalError> for RequestError {
    fn from(err: InternalError) -> Self {
        RequestError::Internal(err)
    }
}

impl From<scursor::WriteError> for RequestError {
    fn from(err: scursor::WriteError) -> Self {
        RequestError::Internal(err.into())
    }
}

/// Reasons an inbound frame is discarded without a reply
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the unit id, function code and (if enabled) CRC require
    TooShort(usize),
    /// The transmitted CRC does not match the one computed over the frame
    CrcMismatch {
        /// CRC carried by the frame
        received: u16,
        /// CRC computed over the frame
        expected: u16,
    },
    /// The frame targets another unit on the bus
    NotForThisUnit(UnitId),
}

impl std::error::Error for FrameError {}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FrameError::TooShort(len) => write!(f, "frame of {len} bytes is too short"),
            FrameError::CrcMismatch { received, expected } => write!(
                f,
                "received CRC ({received:#06X}) does not match the calculated CRC ({expected:#06X})"
            ),
            FrameError::NotForThisUnit(id) => write!(f, "frame is addressed to unit {id}"),
        }
    }
}

/// Errors that indicate a bug in the library while it writes to buffers
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// Byte count would exceed maximum allowed size in the ADU of u8
    BadByteCount(usize),
    /// The write cursor rejected a write or seek operation
    BadWrite,
}

impl std::error::Error for InternalError {}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            InternalError::BadByteCount(size) => write!(
                f,
                "byte count would exceed maximum size of u8: {size}"
            ),
            InternalError::BadWrite => f.write_str("write cursor operation outside of the buffer"),
        }
    }
}

impl From<scursor::WriteError> for InternalError {
    fn from(_: scursor::WriteError) -> Self {
        InternalError::BadWrite
    }
}

/// Errors that occur while decoding the body of a request
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum AduParseError {
    /// the body ended before every field was read
    InsufficientBytes,
    /// bytes remain after every field was read
    TrailingBytes,
}

impl std::fmt::Display for AduParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AduParseError::InsufficientBytes => f.write_str("insufficient bytes for request"),
            AduParseError::TrailingBytes => f.write_str("request contains trailing bytes"),
        }
    }
}

impl From<scursor::ReadError> for AduParseError {
    fn from(_: scursor::ReadError) -> Self {
        AduParseError::InsufficientBytes
    }
}

/// The unit id is outside of the range a serial line slave may use
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidUnitId(pub u8);

impl std::error::Error for InvalidUnitId {}

impl std::fmt::Display for InvalidUnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "unit id {:#04X} is not in the slave range {:#04X}..={:#04X}",
            self.0,
            crate::constants::unit::MIN_UNICAST,
            crate::constants::unit::MAX_UNICAST
        )
    }
}
