use crate::common::function::FunctionCode;
use crate::common::traits::Parse;
use crate::decode::AppDecodeLevel;
use crate::error::AduParseError;
use crate::exception::ExceptionCode;
use crate::server::handler::*;
use crate::types::{
    AddressRange, BitIterator, BitIteratorDisplay, Indexed, RegisterIterator,
    RegisterIteratorDisplay,
};

use scursor::ReadCursor;

/// A request whose function code is supported and whose fields were decoded
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Request<'a> {
    ReadCoils(ReadBits),
    ReadDiscreteInputs(ReadBits),
    ReadHoldingRegisters(ReadRegisters),
    ReadInputRegisters(ReadRegisters),
    WriteSingleCoil(WriteSingleCoil),
    WriteSingleRegister(WriteSingleRegister),
    WriteMultipleCoils(WriteCoils<'a>),
    WriteMultipleRegisters(WriteRegisters<'a>),
}

impl<'a> Request<'a> {
    pub(crate) fn get_function(&self) -> FunctionCode {
        match self {
            Request::ReadCoils(_) => FunctionCode::ReadCoils,
            Request::ReadDiscreteInputs(_) => FunctionCode::ReadDiscreteInputs,
            Request::ReadHoldingRegisters(_) => FunctionCode::ReadHoldingRegisters,
            Request::ReadInputRegisters(_) => FunctionCode::ReadInputRegisters,
            Request::WriteSingleCoil(_) => FunctionCode::WriteSingleCoil,
            Request::WriteSingleRegister(_) => FunctionCode::WriteSingleRegister,
            Request::WriteMultipleCoils(_) => FunctionCode::WriteMultipleCoils,
            Request::WriteMultipleRegisters(_) => FunctionCode::WriteMultipleRegisters,
        }
    }

    /// the handler object that validates and executes this request
    pub(crate) fn handler(&self) -> &dyn FunctionHandler {
        match self {
            Request::ReadCoils(x) => x,
            Request::ReadDiscreteInputs(x) => x,
            Request::ReadHoldingRegisters(x) => x,
            Request::ReadInputRegisters(x) => x,
            Request::WriteSingleCoil(x) => x,
            Request::WriteSingleRegister(x) => x,
            Request::WriteMultipleCoils(x) => x,
            Request::WriteMultipleRegisters(x) => x,
        }
    }

    /// Decode the body of a request, everything after the function code
    ///
    /// Only the structure is checked here. Ranges, values and byte counts are checked
    /// by the handlers against the address space.
    pub(crate) fn parse(function: FunctionCode, body: &'a [u8]) -> Result<Self, ExceptionCode> {
        let mut cursor = ReadCursor::new(body);
        Self::parse_fields(function, &mut cursor).map_err(|err| {
            tracing::warn!("unable to parse {function}: {err}");
            ExceptionCode::IllegalDataValue
        })
    }

    fn parse_fields(
        function: FunctionCode,
        cursor: &mut ReadCursor<'a>,
    ) -> Result<Self, AduParseError> {
        match function {
            FunctionCode::ReadCoils => {
                let x = Request::ReadCoils(ReadBits {
                    table: BitTable::Coils,
                    range: AddressRange::parse(cursor)?,
                });
                expect_empty(cursor)?;
                Ok(x)
            }
            FunctionCode::ReadDiscreteInputs => {
                let x = Request::ReadDiscreteInputs(ReadBits {
                    table: BitTable::DiscreteInputs,
                    range: AddressRange::parse(cursor)?,
                });
                expect_empty(cursor)?;
                Ok(x)
            }
            FunctionCode::ReadHoldingRegisters => {
                let x = Request::ReadHoldingRegisters(ReadRegisters {
                    table: RegisterTable::Holding,
                    range: AddressRange::parse(cursor)?,
                });
                expect_empty(cursor)?;
                Ok(x)
            }
            FunctionCode::ReadInputRegisters => {
                let x = Request::ReadInputRegisters(ReadRegisters {
                    table: RegisterTable::Input,
                    range: AddressRange::parse(cursor)?,
                });
                expect_empty(cursor)?;
                Ok(x)
            }
            FunctionCode::WriteSingleCoil => {
                let x = Request::WriteSingleCoil(WriteSingleCoil(Indexed::<u16>::parse(cursor)?));
                expect_empty(cursor)?;
                Ok(x)
            }
            FunctionCode::WriteSingleRegister => {
                let x = Request::WriteSingleRegister(WriteSingleRegister(Indexed::<u16>::parse(
                    cursor,
                )?));
                expect_empty(cursor)?;
                Ok(x)
            }
            FunctionCode::WriteMultipleCoils => {
                let range = AddressRange::parse(cursor)?;
                let byte_count = cursor.read_u8()?;
                // the payload is kept whole, the handler compares it with the byte count
                let remaining = cursor.remaining();
                let values = cursor.read_bytes(remaining)?;
                Ok(Request::WriteMultipleCoils(WriteCoils {
                    range,
                    byte_count,
                    values,
                }))
            }
            FunctionCode::WriteMultipleRegisters => {
                let range = AddressRange::parse(cursor)?;
                let byte_count = cursor.read_u8()?;
                let remaining = cursor.remaining();
                let values = cursor.read_bytes(remaining)?;
                Ok(Request::WriteMultipleRegisters(WriteRegisters {
                    range,
                    byte_count,
                    values,
                }))
            }
        }
    }
}

fn expect_empty(cursor: &ReadCursor) -> Result<(), AduParseError> {
    if cursor.remaining() == 0 {
        Ok(())
    } else {
        Err(AduParseError::TrailingBytes)
    }
}

pub(crate) struct RequestDisplay<'a, 'b> {
    request: &'a Request<'b>,
    level: AppDecodeLevel,
}

impl<'a, 'b> RequestDisplay<'a, 'b> {
    pub(crate) fn new(level: AppDecodeLevel, request: &'a Request<'b>) -> Self {
        Self { request, level }
    }
}

impl std::fmt::Display for RequestDisplay<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.request.get_function())?;

        if self.level.data_headers() {
            match self.request {
                Request::ReadCoils(x) => write!(f, " {}", x.range)?,
                Request::ReadDiscreteInputs(x) => write!(f, " {}", x.range)?,
                Request::ReadHoldingRegisters(x) => write!(f, " {}", x.range)?,
                Request::ReadInputRegisters(x) => write!(f, " {}", x.range)?,
                Request::WriteSingleCoil(x) => write!(f, " {}", x.0)?,
                Request::WriteSingleRegister(x) => write!(f, " {}", x.0)?,
                Request::WriteMultipleCoils(x) => {
                    write!(
                        f,
                        " {}",
                        BitIteratorDisplay::new(self.level, BitIterator::new(x.range, x.values))
                    )?;
                }
                Request::WriteMultipleRegisters(x) => {
                    write!(
                        f,
                        " {}",
                        RegisterIteratorDisplay::new(
                            self.level,
                            RegisterIterator::new(x.range, x.values)
                        )
                    )?;
                }
            }
        }

        Ok(())
    }
}
