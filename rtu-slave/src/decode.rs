/// Controls the decoding of received requests and transmitted replies at the
/// application, frame, and physical layer
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeLevel {
    /// Controls decoding of the function code and data of requests and replies
    pub app: AppDecodeLevel,
    /// Controls decoding of the RTU frame: unit id, CRC and raw payload
    pub frame: FrameDecodeLevel,
    /// Controls the logging of physical layer read/write
    pub physical: PhysDecodeLevel,
}

/// Controls how received requests and transmitted replies are decoded at the INFO log level
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AppDecodeLevel {
    /// Decode nothing
    #[default]
    Nothing,
    /// Decode the function code only
    FunctionCode,
    /// Decode the function code and the general description of the data
    DataHeaders,
    /// Decode the function code, the general description of the data and the actual data values
    DataValues,
}

/// Controls how the RTU frame is decoded at the INFO log level
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FrameDecodeLevel {
    /// Decode nothing
    #[default]
    Nothing,
    /// Decode the unit id, CRC and payload length
    Header,
    /// Decode the header and the raw payload as hexadecimal
    Payload,
}

/// Controls how bytes read from and written to the physical layer are logged
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PhysDecodeLevel {
    /// Log nothing
    #[default]
    Nothing,
    /// Log only the length of data that is sent and received
    Length,
    /// Log the length and the actual data that is sent and received
    Data,
}

impl DecodeLevel {
    /// construct a `DecodeLevel` with nothing enabled
    pub fn nothing() -> Self {
        Self::default()
    }

    /// construct a `DecodeLevel` from its fields
    pub fn new(app: AppDecodeLevel, frame: FrameDecodeLevel, physical: PhysDecodeLevel) -> Self {
        DecodeLevel {
            app,
            frame,
            physical,
        }
    }

    /// Change the application decode level
    pub fn application(mut self, app: AppDecodeLevel) -> Self {
        self.app = app;
        self
    }

    /// Change the frame decode level
    pub fn frame(mut self, frame: FrameDecodeLevel) -> Self {
        self.frame = frame;
        self
    }

    /// Change the physical layer decode level
    pub fn physical(mut self, physical: PhysDecodeLevel) -> Self {
        self.physical = physical;
        self
    }
}

impl AppDecodeLevel {
    pub(crate) fn enabled(&self) -> bool {
        self.function_code()
    }

    pub(crate) fn function_code(&self) -> bool {
        match self {
            AppDecodeLevel::Nothing => false,
            AppDecodeLevel::FunctionCode => true,
            AppDecodeLevel::DataHeaders => true,
            AppDecodeLevel::DataValues => true,
        }
    }

    pub(crate) fn data_headers(&self) -> bool {
        match self {
            AppDecodeLevel::Nothing => false,
            AppDecodeLevel::FunctionCode => false,
            AppDecodeLevel::DataHeaders => true,
            AppDecodeLevel::DataValues => true,
        }
    }

    pub(crate) fn data_values(&self) -> bool {
        match self {
            AppDecodeLevel::Nothing => false,
            AppDecodeLevel::FunctionCode => false,
            AppDecodeLevel::DataHeaders => false,
            AppDecodeLevel::DataValues => true,
        }
    }
}

impl FrameDecodeLevel {
    pub(crate) fn enabled(&self) -> bool {
        self.header_enabled()
    }

    pub(crate) fn header_enabled(&self) -> bool {
        match self {
            FrameDecodeLevel::Nothing => false,
            FrameDecodeLevel::Header => true,
            FrameDecodeLevel::Payload => true,
        }
    }

    pub(crate) fn payload_enabled(&self) -> bool {
        match self {
            FrameDecodeLevel::Nothing => false,
            FrameDecodeLevel::Header => false,
            FrameDecodeLevel::Payload => true,
        }
    }
}

impl PhysDecodeLevel {
    pub(crate) fn enabled(&self) -> bool {
        self.length_enabled()
    }

    pub(crate) fn length_enabled(&self) -> bool {
        match self {
            PhysDecodeLevel::Nothing => false,
            PhysDecodeLevel::Length => true,
            PhysDecodeLevel::Data => true,
        }
    }

    pub(crate) fn data_enabled(&self) -> bool {
        match self {
            PhysDecodeLevel::Nothing => false,
            PhysDecodeLevel::Length => false,
            PhysDecodeLevel::Data => true,
        }
    }
}
