//! Monotonic millisecond clock
//!
//! `embedded-hal` covers sleeping through [`DelayNs`](embedded_hal::delay::DelayNs)
//! but has no notion of reading the current time. The ready-line wait, the
//! buffer drain and response collection all need a deadline, so the driver
//! takes a [`Clock`] alongside its delay provider.

/// Source of monotonic time in milliseconds.
///
/// The counter is allowed to wrap at `u32::MAX`. Callers treat a deadline
/// that would overflow, or a reading that moves backwards, as an already
/// elapsed timeout.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&mut self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&mut self) -> u32 {
        T::now_ms(self)
    }
}

/// A deadline measured against a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Deadline {
    start: u32,
    end: Option<u32>,
}

impl Deadline {
    /// Starts a deadline `timeout_ms` from now.
    pub(crate) fn after<C: Clock>(clock: &mut C, timeout_ms: u32) -> Self {
        let start = clock.now_ms();
        Self {
            start,
            end: start.checked_add(timeout_ms),
        }
    }

    /// Returns true once the deadline has passed.
    ///
    /// An overflowed deadline is elapsed from the start, as is a clock that
    /// reports a time earlier than when the deadline was created.
    pub(crate) fn elapsed<C: Clock>(&self, clock: &mut C) -> bool {
        let Some(end) = self.end else {
            return true;
        };
        let now = clock.now_ms();
        now < self.start || now > end
    }
}
