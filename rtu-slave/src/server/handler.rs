use crate::common::bits::num_bytes_for_bits;
use crate::constants::{coil, limits};
use crate::exception::ExceptionCode;
use crate::server::response::{BitWriter, RegisterWriter, Reply};
use crate::server::space::{AddressSpace, Bank};
use crate::types::{AddressRange, BitIterator, Indexed, RegisterIterator};

/// Validation and execution of one decoded request
///
/// `apply` is only called after `validate` succeeded against the same address space,
/// so a request that fails validation never mutates anything. `apply` still refuses a
/// range it cannot reach rather than replying as if it had.
pub(crate) trait FunctionHandler {
    /// check the request against the banks it targets without touching them
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode>;

    /// perform the operation and build the body of the normal reply
    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode>;
}

/// Bit banks a read can target
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BitTable {
    Coils,
    DiscreteInputs,
}

/// Register banks a read can target
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RegisterTable {
    Holding,
    Input,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReadBits {
    pub(crate) table: BitTable,
    pub(crate) range: AddressRange,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReadRegisters {
    pub(crate) table: RegisterTable,
    pub(crate) range: AddressRange,
}

/// raw coil value, only 0xFF00 and 0x0000 are accepted
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct WriteSingleCoil(pub(crate) Indexed<u16>);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct WriteSingleRegister(pub(crate) Indexed<u16>);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct WriteCoils<'a> {
    pub(crate) range: AddressRange,
    pub(crate) byte_count: u8,
    pub(crate) values: &'a [u8],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct WriteRegisters<'a> {
    pub(crate) range: AddressRange,
    pub(crate) byte_count: u8,
    pub(crate) values: &'a [u8],
}

impl BitTable {
    fn bank(self, space: &AddressSpace) -> &Bank<bool> {
        match self {
            BitTable::Coils => &space.coils,
            BitTable::DiscreteInputs => &space.discrete_inputs,
        }
    }
}

impl RegisterTable {
    fn bank(self, space: &AddressSpace) -> &Bank<u16> {
        match self {
            RegisterTable::Holding => &space.holding_registers,
            RegisterTable::Input => &space.input_registers,
        }
    }
}

/// Shared bound check for every range request
///
/// The starting address decides between an illegal address and an illegal value: a
/// start outside of the bank (or an absent bank) is an address problem, anything else
/// wrong with the quantity is a value problem. Nothing is ever clamped.
pub(crate) fn check_range(
    bank_len: usize,
    range: AddressRange,
    max_count: u16,
) -> Result<(), ExceptionCode> {
    if range.start as usize >= bank_len {
        return Err(ExceptionCode::IllegalDataAddress);
    }

    if range.count == 0 || range.count > max_count || range.end() > bank_len {
        return Err(ExceptionCode::IllegalDataValue);
    }

    Ok(())
}

fn check_index(bank_len: usize, index: u16) -> Result<(), ExceptionCode> {
    if index as usize >= bank_len {
        return Err(ExceptionCode::IllegalDataAddress);
    }
    Ok(())
}

/// declared byte count must match the quantity and the bytes actually present
fn get_range_of<T: Copy + Default>(bank: &Bank<T>, range: AddressRange) -> Result<&[T], ExceptionCode> {
    bank.range(range).ok_or(ExceptionCode::IllegalDataAddress)
}

fn get_range_mut_of<T: Copy + Default>(
    bank: &mut Bank<T>,
    range: AddressRange,
) -> Result<&mut [T], ExceptionCode> {
    bank.range_mut(range).ok_or(ExceptionCode::IllegalDataAddress)
}

fn check_byte_count(expected: usize, byte_count: u8, values: &[u8]) -> Result<(), ExceptionCode> {
    let byte_count = byte_count as usize;
    if byte_count != expected || values.len() != byte_count {
        return Err(ExceptionCode::IllegalDataValue);
    }
    Ok(())
}

impl FunctionHandler for ReadBits {
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode> {
        check_range(
            self.table.bank(space).len(),
            self.range,
            limits::MAX_READ_COILS_COUNT,
        )
    }

    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode> {
        let values = get_range_of(self.table.bank(space), self.range)?;
        Ok(Reply::Bits(BitWriter::new(self.range.start, values)))
    }
}

impl FunctionHandler for ReadRegisters {
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode> {
        check_range(
            self.table.bank(space).len(),
            self.range,
            limits::MAX_READ_REGISTERS_COUNT,
        )
    }

    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode> {
        let values = get_range_of(self.table.bank(space), self.range)?;
        Ok(Reply::Registers(RegisterWriter::new(self.range.start, values)))
    }
}

impl FunctionHandler for WriteSingleCoil {
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode> {
        check_index(space.coils.len(), self.0.index)?;
        match self.0.value {
            coil::ON | coil::OFF => Ok(()),
            _ => Err(ExceptionCode::IllegalDataValue),
        }
    }

    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode> {
        if !space.coils.set(self.0.index, self.0.value == coil::ON) {
            return Err(ExceptionCode::IllegalDataAddress);
        }
        Ok(Reply::Echo(self.0))
    }
}

impl FunctionHandler for WriteSingleRegister {
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode> {
        check_index(space.holding_registers.len(), self.0.index)
    }

    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode> {
        if !space.holding_registers.set(self.0.index, self.0.value) {
            return Err(ExceptionCode::IllegalDataAddress);
        }
        Ok(Reply::Echo(self.0))
    }
}

impl FunctionHandler for WriteCoils<'_> {
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode> {
        check_range(
            space.coils.len(),
            self.range,
            limits::MAX_WRITE_COILS_COUNT,
        )?;
        check_byte_count(
            num_bytes_for_bits(self.range.count),
            self.byte_count,
            self.values,
        )
    }

    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode> {
        let bank = get_range_mut_of(&mut space.coils, self.range)?;
        for (dest, bit) in bank
            .iter_mut()
            .zip(BitIterator::new(self.range, self.values))
        {
            *dest = bit.value;
        }
        Ok(Reply::Written(self.range))
    }
}

impl FunctionHandler for WriteRegisters<'_> {
    fn validate(&self, space: &AddressSpace) -> Result<(), ExceptionCode> {
        check_range(
            space.holding_registers.len(),
            self.range,
            limits::MAX_WRITE_REGISTERS_COUNT,
        )?;
        check_byte_count(
            2 * self.range.count as usize,
            self.byte_count,
            self.values,
        )
    }

    fn apply<'s>(&self, space: &'s mut AddressSpace) -> Result<Reply<'s>, ExceptionCode> {
        let bank = get_range_mut_of(&mut space.holding_registers, self.range)?;
        for (dest, register) in bank
            .iter_mut()
            .zip(RegisterIterator::new(self.range, self.values))
        {
            *dest = register.value;
        }
        Ok(Reply::Written(self.range))
    }
}
