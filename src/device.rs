//! EBYTE E32 Device Interface
//!
//! This module provides the [`Device`] type, which owns the UART, the mode
//! lines, the optional AUX line and the timing sources of one module, along
//! with a cached copy of its configuration.
//!
//! The device is configured over the same UART that carries radio payloads.
//! Configuration operations switch to program mode, exchange one command and
//! always switch back to normal mode before returning.
//!
//! # Example
//! ```ignore
//! use ebyte::{Device, SaveMode};
//!
//! let mut device = Device::new(uart, m0, m1, aux, delay, clock);
//! device.init()?;
//!
//! device.parameters_mut().channel = 0x10;
//! device.save_parameters(SaveMode::Permanent)?;
//!
//! device.send(b"hello")?;
//! ```

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use embedded_io::{Read, ReadReady, Write};
use regiface::{Command, FromByteArray, NoParameters};

use crate::{clock::Deadline, commands, Clock, Config, Error, Mode, ModelInfo, NoAux, Parameters};

/// Largest payload the module sends as one packet
pub const MAX_PACKET_LEN: usize = 58;

/// Where the driver is in a configuration exchange
///
/// The device rests in `Idle`, in normal mode, with its cache matching the
/// last successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolState {
    /// No exchange in progress
    Idle,
    /// Entering program mode or returning from it
    Programming,
    /// Command sent, waiting for and checking the response
    Verifying,
    /// Parameter frame or reset command being written
    Writing,
}

/// Main device interface for an EBYTE E32 module.
///
/// The device exclusively owns its peripherals and its configuration cache.
/// Every operation takes `&mut self` and blocks until done; sharing a device
/// between execution contexts needs an external mutex.
pub struct Device<UART, M0, M1, AUX, DELAY, CLOCK> {
    pub(crate) uart: UART,
    pub(crate) m0: M0,
    pub(crate) m1: M1,
    pub(crate) aux: Option<AUX>,
    pub(crate) delay: DELAY,
    pub(crate) clock: CLOCK,
    pub(crate) config: Config,
    pub(crate) mode: Option<Mode>,
    state: ProtocolState,
    parameters: Parameters,
    model: ModelInfo,
}

impl<UART, M0, M1, AUX, DELAY, CLOCK> Device<UART, M0, M1, AUX, DELAY, CLOCK> {
    /// Creates a new Device with an AUX ready line.
    ///
    /// The lines are not touched until the first mode change; call
    /// [`init`](Device::init) to put the module into a known state.
    ///
    /// # Arguments
    /// * `uart` - Serial port connected to the module's RXD/TXD
    /// * `m0`, `m1` - Outputs driving the mode lines
    /// * `aux` - Input reading the module's AUX line
    /// * `delay` - Blocking delay provider
    /// * `clock` - Monotonic millisecond clock
    pub fn new(uart: UART, m0: M0, m1: M1, aux: AUX, delay: DELAY, clock: CLOCK) -> Self {
        Self::build(uart, m0, m1, Some(aux), delay, clock)
    }

    fn build(uart: UART, m0: M0, m1: M1, aux: Option<AUX>, delay: DELAY, clock: CLOCK) -> Self {
        Self {
            uart,
            m0,
            m1,
            aux,
            delay,
            clock,
            config: Config::default(),
            mode: None,
            state: ProtocolState::Idle,
            parameters: Parameters::default(),
            model: ModelInfo::default(),
        }
    }

    /// Replaces the timing configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Timing configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mode the lines were last driven to, `None` before the first switch
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Current step of the configuration exchange
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Cached configuration.
    ///
    /// Only matches the module after a successful
    /// [`read_parameters`](Device::read_parameters) or a save.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Mutable access to the cached configuration.
    ///
    /// Changes stay local until [`save_parameters`](Device::save_parameters).
    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Cached identity from the last successful
    /// [`read_model`](Device::read_model)
    pub fn model_info(&self) -> &ModelInfo {
        &self.model
    }

    /// Releases the underlying peripherals.
    ///
    /// Consumes the Device and returns the UART, mode lines, AUX line (if
    /// any), delay and clock.
    pub fn release(self) -> (UART, M0, M1, Option<AUX>, DELAY, CLOCK) {
        (self.uart, self.m0, self.m1, self.aux, self.delay, self.clock)
    }
}

impl<UART, M0, M1, DELAY, CLOCK> Device<UART, M0, M1, NoAux, DELAY, CLOCK> {
    /// Creates a new Device for a board without an AUX line.
    ///
    /// Every ready wait becomes a fixed delay of
    /// [`Config::no_aux_delay_ms`].
    pub fn without_aux(uart: UART, m0: M0, m1: M1, delay: DELAY, clock: CLOCK) -> Self {
        Self::build(uart, m0, m1, None, delay, clock)
    }
}

impl<UART, M0, M1, AUX, DELAY, CLOCK> Device<UART, M0, M1, AUX, DELAY, CLOCK>
where
    UART: Read + Write + ReadReady,
    M0: OutputPin,
    M1: OutputPin,
    AUX: InputPin,
    DELAY: DelayNs,
    CLOCK: Clock,
{
    /// Puts the module into normal mode and loads its identity and
    /// configuration into the cache.
    ///
    /// The model must be read first; some modules answer the first parameter
    /// read after power-up with garbage otherwise.
    ///
    /// # Errors
    /// * `Error::VerificationFailure` - either read returned a bad head
    /// * `Error::BusError` - UART communication failed
    /// * `Error::PinError` - a mode line could not be driven
    pub fn init(&mut self) -> Result<(), Error> {
        self.set_mode(Mode::Normal)?;
        self.read_model()?;
        self.read_parameters()?;
        Ok(())
    }

    /// Reads the model, version and feature bytes.
    ///
    /// The read is repeated up to [`Config::model_read_attempts`] times in
    /// total. The cache is only updated on success.
    ///
    /// # Errors
    /// * `Error::VerificationFailure` - no attempt returned a `0xC3` head
    /// * `Error::BusError` - UART communication failed
    /// * `Error::PinError` - a mode line could not be driven
    pub fn read_model(&mut self) -> Result<ModelInfo, Error> {
        let result = self.program(Self::query_model);
        self.wait_ready(self.config.transfer_timeout_ms);

        let model = result?;
        debug!(
            "model {=u8:#x} version {=u8:#x} features {=u8:#x}",
            model.model,
            model.version,
            model.features
        );
        self.model = model;
        Ok(model)
    }

    fn query_model(&mut self) -> Result<ModelInfo, Error> {
        let attempts = self.config.model_read_attempts.max(1);
        let mut failure = Error::VerificationFailure {
            expected: commands::MODEL_HEAD,
            received: 0x00,
        };

        for attempt in 1..=attempts {
            if attempt > 1 {
                self.delay.delay_ms(self.config.model_retry_delay_ms);
            }

            self.write_command(commands::ReadModel)?;
            self.state = ProtocolState::Verifying;
            match self.read_response::<commands::ModelResponse>() {
                Ok(commands::ModelResponse(model)) => return Ok(model),
                Err(Error::VerificationFailure { expected, received }) => {
                    debug!("model read attempt {} got head {=u8:#x}", attempt, received);
                    failure = Error::VerificationFailure { expected, received };
                }
                Err(err) => return Err(err),
            }
        }

        warn!("model read failed after {} attempts", attempts);
        Err(failure)
    }

    /// Reads the parameter block the module is currently using.
    ///
    /// There is no retry; a bad head fails the call and leaves the cache
    /// untouched.
    ///
    /// # Errors
    /// * `Error::VerificationFailure` - response head was not `0xC0`
    /// * `Error::BusError` - UART communication failed
    /// * `Error::PinError` - a mode line could not be driven
    pub fn read_parameters(&mut self) -> Result<Parameters, Error> {
        let parameters = self.program(|device| {
            device.write_command(commands::ReadParameters)?;
            device.state = ProtocolState::Verifying;
            let commands::ParametersResponse(parameters) = device.read_response()?;
            Ok(parameters)
        })?;

        self.parameters = parameters;
        Ok(parameters)
    }

    /// Writes the cached parameters to the module.
    ///
    /// `head` is the first frame byte, normally a [`SaveMode`](crate::SaveMode). Other values
    /// are passed through unchanged; the module ignores frames it does not
    /// recognise.
    ///
    /// The module does not acknowledge the write, so success only means the
    /// frame went out. Read the parameters back to confirm.
    ///
    /// # Errors
    /// * `Error::BusError` - UART communication failed
    /// * `Error::PinError` - a mode line could not be driven
    pub fn save_parameters(&mut self, head: impl Into<u8>) -> Result<(), Error> {
        let head = head.into();
        self.program(|device| {
            device.delay.delay_ms(device.config.save_lead_ms);

            device.state = ProtocolState::Writing;
            let frame = device.parameters.frame(head);
            device.uart.write_all(&frame).map_err(|_| Error::BusError)?;
            device.uart.flush().map_err(|_| Error::BusError)?;

            device.delay.delay_ms(device.config.save_settle_ms);
            device.wait_ready(device.config.command_timeout_ms);
            Ok(())
        })
    }

    /// Replaces the cached parameters and saves them.
    ///
    /// # Errors
    /// See [`save_parameters`](Device::save_parameters).
    pub fn configure(&mut self, parameters: Parameters, head: impl Into<u8>) -> Result<(), Error> {
        self.parameters = parameters;
        self.save_parameters(head)
    }

    /// Restarts the module firmware.
    ///
    /// This clears the module's buffers but keeps its parameters. To get
    /// back to factory settings, save the datasheet defaults explicitly.
    ///
    /// # Errors
    /// * `Error::BusError` - UART communication failed
    /// * `Error::PinError` - a mode line could not be driven
    pub fn reset(&mut self) -> Result<(), Error> {
        self.program(|device| {
            device.delay.delay_ms(device.config.reset_lead_ms);

            device.state = ProtocolState::Writing;
            device.write_command(commands::Reset)?;
            device.wait_ready(device.config.command_timeout_ms);
            Ok(())
        })
    }

    /// Sends a payload in the current mode and waits for the module to
    /// finish transmitting.
    ///
    /// # Errors
    /// * `Error::BusError` - UART communication failed
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        self.uart.write_all(payload).map_err(|_| Error::BusError)?;
        self.uart.flush().map_err(|_| Error::BusError)?;
        self.wait_ready(self.config.transfer_timeout_ms);
        Ok(())
    }

    /// Sends a payload to another module in fixed transmission mode.
    ///
    /// The payload is prefixed with the target address and channel, which
    /// the sending module strips before going on air. Header and payload go
    /// out in a single write.
    ///
    /// # Errors
    /// * `Error::PayloadTooLong` - payload exceeds [`MAX_PACKET_LEN`] bytes
    /// * `Error::BusError` - UART communication failed
    pub fn send_to(&mut self, address: u16, channel: u8, payload: &[u8]) -> Result<(), Error> {
        if payload.len() > MAX_PACKET_LEN {
            return Err(Error::PayloadTooLong(payload.len()));
        }

        let mut frame = [0u8; 3 + MAX_PACKET_LEN];
        let [high, low] = address.to_be_bytes();
        frame[..3].copy_from_slice(&[high, low, channel]);
        frame[3..3 + payload.len()].copy_from_slice(payload);
        self.send(&frame[..3 + payload.len()])
    }

    /// Receives up to `buffer.len()` payload bytes.
    ///
    /// Stops when the buffer is full or no more data arrives within the
    /// response timeout, then waits for the module to settle.
    ///
    /// # Returns
    /// Number of bytes written into `buffer`
    ///
    /// # Errors
    /// * `Error::BusError` - UART communication failed
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let received = self.collect(buffer)?;
        self.wait_ready(self.config.transfer_timeout_ms);
        Ok(received)
    }

    /// Returns true if received bytes are waiting to be read
    pub fn available(&mut self) -> Result<bool, Error> {
        self.uart.read_ready().map_err(|_| Error::BusError)
    }

    /// Flushes the UART transmit buffer
    pub fn flush(&mut self) -> Result<(), Error> {
        self.uart.flush().map_err(|_| Error::BusError)
    }

    /// Runs `operation` in program mode and always returns to normal mode.
    fn program<T>(
        &mut self,
        operation: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.state = ProtocolState::Programming;
        if let Err(err) = self.set_mode(Mode::Program) {
            self.state = ProtocolState::Idle;
            return Err(err);
        }

        let result = operation(self);

        self.state = ProtocolState::Programming;
        let restored = self.set_mode(Mode::Normal);
        self.state = ProtocolState::Idle;

        let value = result?;
        restored?;
        Ok(value)
    }

    /// Sends a command: its id three times.
    fn write_command<C>(&mut self, _command: C) -> Result<(), Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        self.uart
            .write_all(&[C::id(); 3])
            .map_err(|_| Error::BusError)?;
        self.uart.flush().map_err(|_| Error::BusError)
    }

    /// Reads and parses a 6-byte response.
    ///
    /// Bytes that do not arrive in time stay zero and fail verification.
    fn read_response<R>(&mut self) -> Result<R, Error>
    where
        R: FromByteArray<Error = Error, Array = [u8; 6]>,
    {
        let mut raw = [0u8; 6];
        let received = self.collect(&mut raw)?;
        if received < raw.len() {
            debug!("short response, {} of {} bytes", received, raw.len());
        }
        R::from_bytes(raw)
    }

    /// Fills `buffer` from the UART until full or the response timeout
    /// passes.
    fn collect(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let deadline = Deadline::after(&mut self.clock, self.config.response_timeout_ms);
        let mut filled = 0;

        while filled < buffer.len() {
            if self.uart.read_ready().map_err(|_| Error::BusError)? {
                let n = self
                    .uart
                    .read(&mut buffer[filled..])
                    .map_err(|_| Error::BusError)?;
                if n > 0 {
                    filled += n;
                    continue;
                }
            }
            if deadline.elapsed(&mut self.clock) {
                break;
            }
            self.delay.delay_ms(self.config.ready_poll_interval_ms);
        }

        Ok(filled)
    }
}
