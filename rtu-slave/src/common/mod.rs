pub(crate) mod bits;
pub(crate) mod crc;
pub(crate) mod function;
pub(crate) mod parse;
pub(crate) mod phys;
pub(crate) mod serialize;
pub(crate) mod traits;
