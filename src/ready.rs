//! Ready line (AUX) handling
//!
//! AUX is low while the module is busy (mode switch, self check, buffer
//! flush) and goes high once it accepts new input. The line is optional;
//! without it the driver sleeps a fixed time instead.

use core::convert::Infallible;

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};
use embedded_io::{Read, ReadReady, Write};

use crate::{clock::Deadline, Clock, Device};

/// Outcome of waiting for the module to become ready
///
/// None of these are errors. The wait is best effort and the caller
/// proceeds in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Readiness {
    /// AUX went high within the timeout
    Ready,
    /// AUX stayed low for the whole timeout
    TimedOut,
    /// No usable AUX line, the fixed delay was applied instead
    Assumed,
}

/// Placeholder for boards without a wired AUX line
///
/// See [`Device::without_aux`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAux;

impl ErrorType for NoAux {
    type Error = Infallible;
}

impl InputPin for NoAux {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

/// Samples `aux` until it reads high or `timeout_ms` passes.
fn poll_aux<AUX, DELAY, CLOCK>(
    aux: &mut AUX,
    delay: &mut DELAY,
    clock: &mut CLOCK,
    timeout_ms: u32,
    interval_ms: u32,
) -> Result<Readiness, AUX::Error>
where
    AUX: InputPin,
    DELAY: DelayNs,
    CLOCK: Clock,
{
    let deadline = Deadline::after(clock, timeout_ms);
    loop {
        if aux.is_high()? {
            return Ok(Readiness::Ready);
        }
        if deadline.elapsed(clock) {
            return Ok(Readiness::TimedOut);
        }
        delay.delay_ms(interval_ms);
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
    /// Waits until the module reports ready, for at most `timeout_ms`.
    ///
    /// Without an AUX line this sleeps the configured fallback delay. Either
    /// way it finishes with the quiet period the module needs after AUX
    /// goes high.
    pub fn wait_ready(&mut self, timeout_ms: u32) -> Readiness {
        let readiness = match self.aux.as_mut() {
            Some(aux) => match poll_aux(
                aux,
                &mut self.delay,
                &mut self.clock,
                timeout_ms,
                self.config.ready_poll_interval_ms,
            ) {
                Ok(readiness) => readiness,
                Err(_) => {
                    warn!("AUX unreadable, falling back to fixed delay");
                    self.delay.delay_ms(self.config.no_aux_delay_ms);
                    Readiness::Assumed
                }
            },
            None => {
                self.delay.delay_ms(self.config.no_aux_delay_ms);
                Readiness::Assumed
            }
        };

        if readiness == Readiness::TimedOut {
            warn!("AUX still low after {} ms, proceeding", timeout_ms);
        }

        self.delay.delay_ms(self.config.ready_settle_ms);
        readiness
    }

    /// Current AUX level, `None` without a readable AUX line
    pub fn aux(&mut self) -> Option<bool> {
        self.aux.as_mut().and_then(|aux| aux.is_high().ok())
    }
}
