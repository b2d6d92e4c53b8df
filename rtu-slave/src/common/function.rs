use std::fmt::{Display, Formatter};

mod constants {
    pub(crate) const READ_COILS: u8 = 1;
    pub(crate) const READ_DISCRETE_INPUTS: u8 = 2;
    pub(crate) const READ_HOLDING_REGISTERS: u8 = 3;
    pub(crate) const READ_INPUT_REGISTERS: u8 = 4;
    pub(crate) const WRITE_SINGLE_COIL: u8 = 5;
    pub(crate) const WRITE_SINGLE_REGISTER: u8 = 6;
    pub(crate) const WRITE_MULTIPLE_COILS: u8 = 15;
    pub(crate) const WRITE_MULTIPLE_REGISTERS: u8 = 16;
}

/// marker OR-ed into the function code of an exception reply
pub(crate) const EXCEPTION_MARKER: u8 = 0x80;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum FunctionCode {
    ReadCoils = constants::READ_COILS,
    ReadDiscreteInputs = constants::READ_DISCRETE_INPUTS,
    ReadHoldingRegisters = constants::READ_HOLDING_REGISTERS,
    ReadInputRegisters = constants::READ_INPUT_REGISTERS,
    WriteSingleCoil = constants::WRITE_SINGLE_COIL,
    WriteSingleRegister = constants::WRITE_SINGLE_REGISTER,
    WriteMultipleCoils = constants::WRITE_MULTIPLE_COILS,
    WriteMultipleRegisters = constants::WRITE_MULTIPLE_REGISTERS,
}

/// How the length of a request frame (unit id through payload, CRC excluded) is constrained
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum LengthRule {
    /// single operations always carry an address and a quantity or value
    Exactly(usize),
    /// multi-writes carry at least an address, a quantity and a byte count
    AtLeast(usize),
}

impl LengthRule {
    pub(crate) fn accepts(self, length: usize) -> bool {
        match self {
            LengthRule::Exactly(x) => length == x,
            LengthRule::AtLeast(x) => length >= x,
        }
    }
}

impl Display for FunctionCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            FunctionCode::ReadCoils => write!(f, "READ COILS ({:#04X})", self.get_value()),
            FunctionCode::ReadDiscreteInputs => {
                write!(f, "READ DISCRETE INPUTS ({:#04X})", self.get_value())
            }
            FunctionCode::ReadHoldingRegisters => {
                write!(f, "READ HOLDING REGISTERS ({:#04X})", self.get_value())
            }
            FunctionCode::ReadInputRegisters => {
                write!(f, "READ INPUT REGISTERS ({:#04X})", self.get_value())
            }
            FunctionCode::WriteSingleCoil => {
                write!(f, "WRITE SINGLE COIL ({:#04X})", self.get_value())
            }
            FunctionCode::WriteSingleRegister => {
                write!(f, "WRITE SINGLE REGISTER ({:#04X})", self.get_value())
            }
            FunctionCode::WriteMultipleCoils => {
                write!(f, "WRITE MULTIPLE COILS ({:#04X})", self.get_value())
            }
            FunctionCode::WriteMultipleRegisters => {
                write!(f, "WRITE MULTIPLE REGISTERS ({:#04X})", self.get_value())
            }
        }
    }
}

impl FunctionCode {
    pub(crate) const fn get_value(self) -> u8 {
        self as u8
    }

    pub(crate) const fn as_error(self) -> u8 {
        self.get_value() | EXCEPTION_MARKER
    }

    pub(crate) fn get(value: u8) -> Option<Self> {
        match value {
            constants::READ_COILS => Some(FunctionCode::ReadCoils),
            constants::READ_DISCRETE_INPUTS => Some(FunctionCode::ReadDiscreteInputs),
            constants::READ_HOLDING_REGISTERS => Some(FunctionCode::ReadHoldingRegisters),
            constants::READ_INPUT_REGISTERS => Some(FunctionCode::ReadInputRegisters),
            constants::WRITE_SINGLE_COIL => Some(FunctionCode::WriteSingleCoil),
            constants::WRITE_SINGLE_REGISTER => Some(FunctionCode::WriteSingleRegister),
            constants::WRITE_MULTIPLE_COILS => Some(FunctionCode::WriteMultipleCoils),
            constants::WRITE_MULTIPLE_REGISTERS => Some(FunctionCode::WriteMultipleRegisters),
            _ => None,
        }
    }

    pub(crate) fn length_rule(self) -> LengthRule {
        match self {
            FunctionCode::ReadCoils
            | FunctionCode::ReadDiscreteInputs
            | FunctionCode::ReadHoldingRegisters
            | FunctionCode::ReadInputRegisters
            | FunctionCode::WriteSingleCoil
            | FunctionCode::WriteSingleRegister => LengthRule::Exactly(6),
            FunctionCode::WriteMultipleCoils | FunctionCode::WriteMultipleRegisters => {
                LengthRule::AtLeast(7)
            }
        }
    }

    /// only writes have an effect when received on the broadcast address
    pub(crate) fn is_write(self) -> bool {
        match self {
            FunctionCode::ReadCoils
            | FunctionCode::ReadDiscreteInputs
            | FunctionCode::ReadHoldingRegisters
            | FunctionCode::ReadInputRegisters => false,
            FunctionCode::WriteSingleCoil
            | FunctionCode::WriteSingleRegister
            | FunctionCode::WriteMultipleCoils
            | FunctionCode::WriteMultipleRegisters => true,
        }
    }
}

/// Function code byte written into a reply
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum FunctionField {
    Valid(FunctionCode),
    Exception(FunctionCode),
    UnknownFunction(u8),
}

impl FunctionField {
    pub(crate) const fn get_value(self) -> u8 {
        match self {
            FunctionField::Valid(function) => function.get_value(),
            FunctionField::Exception(function) => function.as_error(),
            FunctionField::UnknownFunction(raw) => raw | EXCEPTION_MARKER,
        }
    }
}

impl Display for FunctionField {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            FunctionField::Valid(function) => write!(f, "{function}"),
            FunctionField::Exception(function) => write!(f, "EXCEPTION {function}"),
            FunctionField::UnknownFunction(raw) => write!(f, "UNKNOWN FUNCTION ({raw:#04X})"),
        }
    }
}
