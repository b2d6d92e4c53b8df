/// Wire values for the coil state in a write single coil request
pub mod coil {
    /// u16 representation of COIL == ON when performing write single coil
    pub const ON: u16 = 0xFF00;
    /// u16 representation of COIL == OFF when performing write single coil
    pub const OFF: u16 = 0x0000;
}

/// Maximum quantities allowed by the protocol in a single request
pub mod limits {
    /// Maximum count allowed in a read coils/discrete inputs request
    pub const MAX_READ_COILS_COUNT: u16 = 0x07D0;
    /// Maximum count allowed in a read holding/input registers request
    pub const MAX_READ_REGISTERS_COUNT: u16 = 0x007D;
    /// Maximum count allowed in a `write multiple coils` request
    pub const MAX_WRITE_COILS_COUNT: u16 = 0x07B0;
    /// Maximum count allowed in a `write multiple registers` request
    pub const MAX_WRITE_REGISTERS_COUNT: u16 = 0x007B;
}

/// Raw exception code values
pub mod exceptions {
    /// Illegal function
    pub const ILLEGAL_FUNCTION: u8 = 0x01;
    /// Illegal data address
    pub const ILLEGAL_DATA_ADDRESS: u8 = 0x02;
    /// Illegal data value
    pub const ILLEGAL_DATA_VALUE: u8 = 0x03;
    /// Server device failure
    pub const SERVER_DEVICE_FAILURE: u8 = 0x04;
}

/// Unit identifiers on a serial line
pub mod unit {
    /// Requests addressed to this id are executed by every slave and never answered
    pub const BROADCAST: u8 = 0x00;
    /// Lowest unit id a slave may be configured with
    pub const MIN_UNICAST: u8 = 0x01;
    /// Highest unit id a slave may be configured with, 248..=255 are reserved
    pub const MAX_UNICAST: u8 = 0xF7;
}
