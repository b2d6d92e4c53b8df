use crate::common::function::{FunctionCode, FunctionField};
use crate::common::traits::Serialize;
use crate::decode::DecodeLevel;
use crate::error::{FrameError, InvalidUnitId, RequestError};
use crate::exception::ExceptionCode;
use crate::phys::PhysLayer;
use crate::serial::frame::{constants, parse_request, CrcMode, FrameWriter, RequestFrame};
use crate::server::request::{Request, RequestDisplay};
use crate::server::response::{Reply, ReplyDisplay};
use crate::server::space::AddressSpace;
use crate::types::UnitId;

/// What a single call to [`RtuSlave::poll`] did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// No bytes were waiting on the physical layer
    Idle,
    /// The frame was discarded without a reply
    Dropped(FrameError),
    /// The request was executed and a normal reply was transmitted
    Replied,
    /// An exception reply with this code was transmitted
    Exception(ExceptionCode),
    /// The request was addressed to the broadcast id so nothing was transmitted.
    /// Valid broadcast writes were still executed.
    Suppressed,
}

/// Result of running one frame through the dispatcher, before anything is transmitted
enum Dispatch<'s> {
    Reply(FunctionCode, Reply<'s>),
    Exception(FunctionField, ExceptionCode),
    /// broadcast reads have no effect
    Ignored,
}

/// Modbus RTU slave bound to one unit id and one physical layer
///
/// The slave owns no point data. Each call to [`RtuSlave::poll`] borrows the
/// [`AddressSpace`] for the duration of at most one request.
pub struct RtuSlave<P>
where
    P: PhysLayer,
{
    unit_id: UnitId,
    phys: P,
    crc_mode: CrcMode,
    decode: DecodeLevel,
    rx: [u8; constants::MAX_FRAME_LENGTH],
    writer: FrameWriter,
}

impl<P> std::fmt::Debug for RtuSlave<P>
where
    P: PhysLayer,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RtuSlave")
            .field("unit_id", &self.unit_id)
            .field("crc_mode", &self.crc_mode)
            .field("decode", &self.decode)
            .finish()
    }
}

impl<P> RtuSlave<P>
where
    P: PhysLayer,
{
    /// Create a slave answering to `unit_id` on `phys`
    ///
    /// The id must be in the serial line unicast range `1..=247`. CRC checking is enabled.
    pub fn new(unit_id: u8, phys: P, decode: DecodeLevel) -> Result<Self, InvalidUnitId> {
        let unit_id = UnitId::checked_slave_id(unit_id)?;
        Ok(Self {
            unit_id,
            phys,
            crc_mode: CrcMode::default(),
            decode,
            rx: [0; constants::MAX_FRAME_LENGTH],
            writer: FrameWriter::new(),
        })
    }

    /// Unit id this slave answers to
    pub fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    /// Enable or disable the CRC on requests and replies
    pub fn set_crc_mode(&mut self, mode: CrcMode) {
        self.crc_mode = mode;
    }

    /// Current CRC mode
    pub fn crc_mode(&self) -> CrcMode {
        self.crc_mode
    }

    /// Change the decoding level used for logging
    pub fn set_decode_level(&mut self, level: DecodeLevel) {
        self.decode = level;
    }

    /// Access the physical layer
    pub fn phys_mut(&mut self) -> &mut P {
        &mut self.phys
    }

    /// Consume the slave, returning the physical layer
    pub fn into_inner(self) -> P {
        self.phys
    }

    /// Process at most one request
    ///
    /// Returns immediately with [`PollOutcome::Idle`] if nothing is waiting. Otherwise one
    /// frame is read, validated, executed against `space` and answered as required, and
    /// whatever input remains afterwards is discarded. Protocol problems are reported in the
    /// outcome; only transport failures and internal errors are returned as `Err`.
    pub fn poll(&mut self, space: &mut AddressSpace) -> Result<PollOutcome, RequestError> {
        if self.phys.bytes_available()? == 0 {
            return Ok(PollOutcome::Idle);
        }

        let read = crate::common::phys::read(&mut self.phys, &mut self.rx, self.decode.physical);
        let outcome = match read {
            Ok(length) => self.process(length, space),
            Err(err) => Err(err.into()),
        };

        // a frame is never carried over into the next cycle, even after a failed read
        self.phys.discard_input()?;

        outcome
    }

    fn process(
        &mut self,
        length: usize,
        space: &mut AddressSpace,
    ) -> Result<PollOutcome, RequestError> {
        let frame = match parse_request(
            &self.rx[..length],
            self.unit_id,
            self.crc_mode,
            self.decode.frame,
        ) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!("dropped frame: {}", err);
                return Ok(PollOutcome::Dropped(err));
            }
        };

        let dispatch = dispatch(&frame, space, self.decode);

        if frame.destination.is_broadcast() {
            if let Dispatch::Exception(function, ex) = dispatch {
                tracing::warn!("broadcast {} failed: {}", function, ex);
            }
            return Ok(PollOutcome::Suppressed);
        }

        match dispatch {
            Dispatch::Reply(function, reply) => {
                if self.decode.app.enabled() {
                    tracing::info!(
                        "PDU TX - {}{}",
                        function,
                        ReplyDisplay::new(self.decode.app, &reply)
                    );
                }
                match self.transmit(FunctionField::Valid(function), &reply) {
                    Ok(()) => Ok(PollOutcome::Replied),
                    Err(RequestError::Internal(err)) => {
                        tracing::warn!("unable to format reply to {}: {}", function, err);
                        let ex = ExceptionCode::ServerDeviceFailure;
                        self.transmit(FunctionField::Exception(function), &ex)?;
                        Ok(PollOutcome::Exception(ex))
                    }
                    Err(err) => Err(err),
                }
            }
            Dispatch::Exception(function, ex) => {
                tracing::warn!("{} - {}", function, ex);
                self.transmit(function, &ex)?;
                Ok(PollOutcome::Exception(ex))
            }
            Dispatch::Ignored => Ok(PollOutcome::Suppressed),
        }
    }

    fn transmit(&mut self, function: FunctionField, body: &dyn Serialize) -> Result<(), RequestError> {
        let bytes = self.writer.format(
            self.unit_id,
            function,
            body,
            self.crc_mode,
            self.decode.frame,
        )?;
        crate::common::phys::write(&mut self.phys, bytes, self.decode.physical)?;
        Ok(())
    }
}

/// Map a validated frame onto a handler and run it against the address space
fn dispatch<'s>(
    frame: &RequestFrame,
    space: &'s mut AddressSpace,
    decode: DecodeLevel,
) -> Dispatch<'s> {
    let function = match FunctionCode::get(frame.function) {
        Some(x) => x,
        None => {
            return Dispatch::Exception(
                FunctionField::UnknownFunction(frame.function),
                ExceptionCode::IllegalFunction,
            )
        }
    };

    if !function.length_rule().accepts(frame.len()) {
        tracing::warn!(
            "{} request has invalid length: {}",
            function,
            frame.len()
        );
        return Dispatch::Exception(
            FunctionField::Exception(function),
            ExceptionCode::IllegalDataValue,
        );
    }

    let request = match Request::parse(function, frame.body) {
        Ok(x) => x,
        Err(ex) => return Dispatch::Exception(FunctionField::Exception(function), ex),
    };

    if decode.app.enabled() {
        tracing::info!("PDU RX - {}", RequestDisplay::new(decode.app, &request));
    }

    if frame.destination.is_broadcast() && !function.is_write() {
        return Dispatch::Ignored;
    }

    let handler = request.handler();
    if let Err(ex) = handler.validate(space) {
        return Dispatch::Exception(FunctionField::Exception(function), ex);
    }

    match handler.apply(space) {
        Ok(reply) => Dispatch::Reply(function, reply),
        Err(ex) => Dispatch::Exception(FunctionField::Exception(function), ex),
    }
}
