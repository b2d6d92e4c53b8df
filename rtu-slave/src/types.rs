use crate::decode::AppDecodeLevel;
use crate::error::InvalidUnitId;

/// Modbus unit identifier, just a type-safe wrapper around `u8`
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub struct UnitId {
    /// underlying raw value
    pub value: u8,
}

/// Start and count tuple exactly as it was carried by a request
///
/// Unlike a validated range, the count may be zero and the range may run past the end
/// of the address space. Handlers check it against the bank it targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRange {
    /// Starting address of the range
    pub start: u16,
    /// Count of elements in the range
    pub count: u16,
}

/// Value and its address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indexed<T> {
    /// Address of the value
    pub index: u16,
    /// Associated value
    pub value: T,
}

/// Zero-copy type used to iterate over the packed bits of a write multiple coils request
#[derive(Debug, Copy, Clone)]
pub(crate) struct BitIterator<'a> {
    bytes: &'a [u8],
    range: AddressRange,
    pos: u16,
}

/// Zero-copy type used to iterate over the big-endian words of a write multiple registers request
#[derive(Debug, Copy, Clone)]
pub(crate) struct RegisterIterator<'a> {
    bytes: &'a [u8],
    range: AddressRange,
    pos: u16,
}

pub(crate) struct BitIteratorDisplay<'a> {
    iterator: BitIterator<'a>,
    level: AppDecodeLevel,
}

pub(crate) struct RegisterIteratorDisplay<'a> {
    iterator: RegisterIterator<'a>,
    level: AppDecodeLevel,
}

impl UnitId {
    /// Create a new UnitId
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    /// Broadcast address, requests sent to it are never answered
    pub const fn broadcast() -> Self {
        Self {
            value: crate::constants::unit::BROADCAST,
        }
    }

    /// Returns true if this is the broadcast address
    pub fn is_broadcast(self) -> bool {
        self == Self::broadcast()
    }

    /// Validate that a slave may be configured with this address
    pub fn checked_slave_id(value: u8) -> Result<Self, InvalidUnitId> {
        if (crate::constants::unit::MIN_UNICAST..=crate::constants::unit::MAX_UNICAST)
            .contains(&value)
        {
            Ok(Self { value })
        } else {
            Err(InvalidUnitId(value))
        }
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#04X}", self.value)
    }
}

impl AddressRange {
    /// Create a new address range
    pub const fn new(start: u16, count: u16) -> Self {
        Self { start, count }
    }

    /// Address one past the last element, computed without overflow
    pub fn end(self) -> usize {
        self.start as usize + self.count as usize
    }

    /// Converts to std::ops::Range
    pub fn to_std_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end()
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "start: {:#06X} qty: {}", self.start, self.count)
    }
}

impl<T> Indexed<T> {
    /// Create a new indexed value
    pub fn new(index: u16, value: T) -> Self {
        Indexed { index, value }
    }
}

impl std::fmt::Display for Indexed<bool> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "idx: {:#06X} value: {}", self.index, self.value as i32)
    }
}

impl std::fmt::Display for Indexed<u16> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "idx: {:#06X} value: {:#06X}", self.index, self.value)
    }
}

impl<'a> BitIterator<'a> {
    /// iterates the first `range.count` bits of `bytes`, low bit of the first byte first
    pub(crate) fn new(range: AddressRange, bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            range,
            pos: 0,
        }
    }
}

impl<'a> RegisterIterator<'a> {
    pub(crate) fn new(range: AddressRange, bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            range,
            pos: 0,
        }
    }
}

impl<'a> Iterator for BitIterator<'a> {
    type Item = Indexed<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == self.range.count {
            return None;
        }
        let byte = self.pos / 8;
        let bit = (self.pos % 8) as u8;

        match self.bytes.get(byte as usize) {
            Some(value) => {
                let bit = (*value & (1 << bit)) != 0;
                let address = self.range.start.wrapping_add(self.pos);
                self.pos += 1;
                Some(Indexed::new(address, bit))
            }
            None => None,
        }
    }

    /// implementing this allows collect to optimize the vector capacity
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.range.count - self.pos) as usize;
        (0, Some(remaining))
    }
}

impl<'a> Iterator for RegisterIterator<'a> {
    type Item = Indexed<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == self.range.count {
            return None;
        }

        let pos = 2 * (self.pos as usize);
        match self.bytes.get(pos..pos + 2) {
            Some([high, low]) => {
                let value = crate::common::bits::to_word(*high, *low);
                let index = self.range.start.wrapping_add(self.pos);
                self.pos += 1;
                Some(Indexed::new(index, value))
            }
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.range.count - self.pos) as usize;
        (0, Some(remaining))
    }
}

impl<'a> BitIteratorDisplay<'a> {
    pub(crate) fn new(level: AppDecodeLevel, iterator: BitIterator<'a>) -> Self {
        Self { iterator, level }
    }
}

impl std::fmt::Display for BitIteratorDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.iterator.range)?;

        if self.level.data_values() {
            for x in self.iterator {
                write!(f, "\n{x}")?;
            }
        }

        Ok(())
    }
}

impl<'a> RegisterIteratorDisplay<'a> {
    pub(crate) fn new(level: AppDecodeLevel, iterator: RegisterIterator<'a>) -> Self {
        Self { iterator, level }
    }
}

impl std::fmt::Display for RegisterIteratorDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.iterator.range)?;

        if self.level.data_values() {
            for x in self.iterator {
                write!(f, "\n{x}")?;
            }
        }

        Ok(())
    }
}
