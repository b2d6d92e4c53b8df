use crate::types::AddressRange;

/// A fixed-length bank of points owned by an [`AddressSpace`]
///
/// A bank that was never registered has a length of zero, so every request that
/// targets it fails with an illegal data address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bank<T> {
    values: Vec<T>,
}

impl<T> Bank<T>
where
    T: Copy + Default,
{
    /// Take ownership of `storage` and reset every element to its zero value
    ///
    /// The length of the bank is the length of `storage` and never changes until the
    /// bank is registered again.
    pub fn register(storage: Vec<T>) -> Self {
        let mut values = storage;
        values.iter_mut().for_each(|x| *x = T::default());
        Self { values }
    }

    /// Number of points in the bank
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the bank was never registered or was registered without storage
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, if it is inside the bank
    pub fn get(&self, index: u16) -> Option<T> {
        self.values.get(index as usize).copied()
    }

    /// Change the value at `index`, returning false if it is outside the bank
    pub fn set(&mut self, index: u16, value: T) -> bool {
        match self.values.get_mut(index as usize) {
            Some(x) => {
                *x = value;
                true
            }
            None => false,
        }
    }

    /// All the values of the bank
    pub fn as_slice(&self) -> &[T] {
        self.values.as_slice()
    }

    /// All the values of the bank, for the application to update between polls
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.values.as_mut_slice()
    }

    pub(crate) fn range(&self, range: AddressRange) -> Option<&[T]> {
        self.values.get(range.to_std_range())
    }

    pub(crate) fn range_mut(&mut self, range: AddressRange) -> Option<&mut [T]> {
        self.values.get_mut(range.to_std_range())
    }
}

/// The four banks of points a slave exposes to the bus
///
/// The space is owned by the application and lent to [`crate::server::RtuSlave::poll`]
/// for the duration of one request. Applications that share it with other threads
/// should wrap it in a `Mutex` and hold the lock around each poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressSpace {
    pub(crate) coils: Bank<bool>,
    pub(crate) discrete_inputs: Bank<bool>,
    pub(crate) holding_registers: Bank<u16>,
    pub(crate) input_registers: Bank<u16>,
}

impl AddressSpace {
    /// An address space with no registered banks
    pub fn new() -> Self {
        Self::default()
    }

    /// An address space with every bank registered and zeroed
    pub fn with_sizes(
        coils: usize,
        discrete_inputs: usize,
        holding_registers: usize,
        input_registers: usize,
    ) -> Self {
        let mut space = Self::new();
        space.register_coils(vec![false; coils]);
        space.register_discrete_inputs(vec![false; discrete_inputs]);
        space.register_holding_registers(vec![0; holding_registers]);
        space.register_input_registers(vec![0; input_registers]);
        space
    }

    /// Replace the coil bank (discrete outputs) with `storage`, zero-filled
    pub fn register_coils(&mut self, storage: Vec<bool>) {
        self.coils = Bank::register(storage);
    }

    /// Replace the discrete input bank with `storage`, zero-filled
    pub fn register_discrete_inputs(&mut self, storage: Vec<bool>) {
        self.discrete_inputs = Bank::register(storage);
    }

    /// Replace the holding register bank (analog outputs) with `storage`, zero-filled
    pub fn register_holding_registers(&mut self, storage: Vec<u16>) {
        self.holding_registers = Bank::register(storage);
    }

    /// Replace the input register bank with `storage`, zero-filled
    pub fn register_input_registers(&mut self, storage: Vec<u16>) {
        self.input_registers = Bank::register(storage);
    }

    /// Coils
    pub fn coils(&self) -> &Bank<bool> {
        &self.coils
    }

    /// Coils
    pub fn coils_mut(&mut self) -> &mut Bank<bool> {
        &mut self.coils
    }

    /// Discrete inputs
    pub fn discrete_inputs(&self) -> &Bank<bool> {
        &self.discrete_inputs
    }

    /// Discrete inputs are read-only on the bus, the application updates them here
    pub fn discrete_inputs_mut(&mut self) -> &mut Bank<bool> {
        &mut self.discrete_inputs
    }

    /// Holding registers
    pub fn holding_registers(&self) -> &Bank<u16> {
        &self.holding_registers
    }

    /// Holding registers
    pub fn holding_registers_mut(&mut self) -> &mut Bank<u16> {
        &mut self.holding_registers
    }

    /// Input registers
    pub fn input_registers(&self) -> &Bank<u16> {
        &self.input_registers
    }

    /// Input registers are read-only on the bus, the application updates them here
    pub fn input_registers_mut(&mut self) -> &mut Bank<u16> {
        &mut self.input_registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_banks_are_empty() {
        let space = AddressSpace::new();
        assert!(space.coils().is_empty());
        assert!(space.discrete_inputs().is_empty());
        assert!(space.holding_registers().is_empty());
        assert!(space.input_registers().is_empty());
        assert_eq!(space.coils().get(0), None);
    }

    #[test]
    fn registration_zero_fills_the_storage() {
        let mut space = AddressSpace::new();
        space.register_holding_registers(vec![0xCAFE, 0xBEEF, 7]);
        space.register_coils(vec![true; 5]);
        assert_eq!(space.holding_registers().as_slice(), &[0, 0, 0]);
        assert_eq!(space.coils().as_slice(), &[false; 5]);
    }

    #[test]
    fn re_registration_replaces_the_bank() {
        let mut space = AddressSpace::with_sizes(0, 0, 4, 0);
        space.holding_registers_mut().set(3, 42);
        space.register_holding_registers(vec![9; 2]);
        assert_eq!(space.holding_registers().len(), 2);
        assert_eq!(space.holding_registers().get(3), None);
        assert_eq!(space.holding_registers().as_slice(), &[0, 0]);
    }

    #[test]
    fn set_outside_of_the_bank_is_refused() {
        let mut space = AddressSpace::with_sizes(3, 0, 0, 0);
        assert!(space.coils_mut().set(2, true));
        assert!(!space.coils_mut().set(3, true));
        assert_eq!(space.coils().as_slice(), &[false, false, true]);
    }

    #[test]
    fn ranges_must_lie_inside_the_bank() {
        let space = AddressSpace::with_sizes(0, 0, 10, 0);
        assert_eq!(
            space.holding_registers.range(AddressRange::new(8, 2)),
            Some(&[0u16, 0][..])
        );
        assert_eq!(space.holding_registers.range(AddressRange::new(9, 2)), None);
        assert_eq!(
            space.holding_registers.range(AddressRange::new(u16::MAX, 2)),
            None
        );
    }
}
