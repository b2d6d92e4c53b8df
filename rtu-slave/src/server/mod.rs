pub(crate) mod handler;
pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod space;
pub(crate) mod task;

pub use space::{AddressSpace, Bank};
pub use task::{PollOutcome, RtuSlave};
