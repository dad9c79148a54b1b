//! Receive buffer draining
//!
//! Serial bridges and software UARTs keep bytes around long after they were
//! sent. Anything still buffered when a command goes out ends up in front of
//! the response, so the buffer is emptied before every command.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};
use embedded_io::{Read, ReadReady, Write};

use crate::{clock::Deadline, Clock, Device};

/// Result of draining the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Drain {
    /// Number of bytes thrown away
    pub discarded: usize,
    /// The transport still had data when the drain timeout passed
    pub runaway: bool,
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
    /// Reads and discards input until the transport reports nothing left.
    ///
    /// Bounded by the drain timeout, so a transport that never runs dry
    /// cannot stall the driver. Transport errors end the drain early.
    pub fn drain(&mut self) -> Drain {
        let deadline = Deadline::after(&mut self.clock, self.config.drain_timeout_ms);
        let mut scratch = [0u8; 16];
        let mut discarded = 0;

        loop {
            match self.uart.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(_) => {
                    warn!("read_ready failed while draining");
                    break;
                }
            }

            match self.uart.read(&mut scratch) {
                Ok(n) => discarded += n,
                Err(_) => {
                    warn!("read failed while draining");
                    break;
                }
            }

            if deadline.elapsed(&mut self.clock) {
                warn!("runaway input, gave up after {} bytes", discarded);
                return Drain {
                    discarded,
                    runaway: true,
                };
            }
        }

        if discarded > 0 {
            debug!("drained {} stale bytes", discarded);
        }

        Drain {
            discarded,
            runaway: false,
        }
    }
}
