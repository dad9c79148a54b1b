//! Operating mode control
//!
//! The module's operating mode is selected by two input lines, M0 and M1:
//!
//! | Mode | M0 | M1 |
//! |---|---|---|
//! | Normal | low | low |
//! | Wake-up | high | low |
//! | Power-down | low | high |
//! | Program | high | high |
//!
//! Every mode can be entered from every other mode. The module needs time
//! on both sides of a line change and signals the end of the switch on AUX.

use bitflags::bitflags;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};
use embedded_io::{Read, ReadReady, Write};

use crate::{Clock, Device, Error};

bitflags! {
    /// Mode line levels
    ///
    /// A set flag drives the corresponding line high.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeLines: u8 {
        /// M0 line
        const M0 = 1 << 0;
        /// M1 line
        const M1 = 1 << 1;
    }
}

/// Operating mode of the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// UART open, radio transmits and receives
    Normal,
    /// Like normal, but a wake-up preamble is prepended to each packet
    Wakeup,
    /// Radio off, UART off; wakes on a wake-up preamble
    PowerDown,
    /// Configuration commands accepted over UART, radio off
    Program,
}

impl Mode {
    /// Line levels selecting this mode
    pub fn lines(self) -> ModeLines {
        match self {
            Self::Normal => ModeLines::empty(),
            Self::Wakeup => ModeLines::M0,
            Self::PowerDown => ModeLines::M1,
            Self::Program => ModeLines::M0 | ModeLines::M1,
        }
    }
}

impl From<ModeLines> for Mode {
    fn from(lines: ModeLines) -> Self {
        match (lines.contains(ModeLines::M0), lines.contains(ModeLines::M1)) {
            (false, false) => Self::Normal,
            (true, false) => Self::Wakeup,
            (false, true) => Self::PowerDown,
            (true, true) => Self::Program,
        }
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
    /// Switches the module to `mode`.
    ///
    /// Waits the settle time, drives both lines, waits again, drops any
    /// stale input and finally waits for the module to report ready. A ready
    /// line that never goes high does not fail the switch.
    ///
    /// If a line cannot be driven the mode is reported as unknown, since
    /// the other line may already have changed.
    ///
    /// # Errors
    /// * `Error::PinError` - a mode line could not be driven
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        let lines = mode.lines();
        trace!("set mode {}", mode);

        self.delay.delay_ms(self.config.mode_settle_ms);
        // Unknown until both lines are driven
        self.mode = None;
        self.m0
            .set_state(PinState::from(lines.contains(ModeLines::M0)))
            .map_err(|_| Error::PinError)?;
        self.m1
            .set_state(PinState::from(lines.contains(ModeLines::M1)))
            .map_err(|_| Error::PinError)?;
        self.delay.delay_ms(self.config.mode_settle_ms);
        self.mode = Some(mode);

        // Junk left in the receive buffer corrupts the next response
        self.drain();
        self.wait_ready(self.config.mode_change_timeout_ms);

        Ok(())
    }

    /// Puts the module into power-down mode
    pub fn power_down(&mut self) -> Result<(), Error> {
        self.set_mode(Mode::PowerDown)
    }

    /// Brings the module back to normal mode
    pub fn power_up(&mut self) -> Result<(), Error> {
        self.set_mode(Mode::Normal)
    }
}
