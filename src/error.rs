//! Driver error type

/// Errors returned by [`Device`](crate::Device) operations.
///
/// A ready line that never goes high and an input buffer that never runs dry
/// are not errors; both are reported through
/// [`Readiness`](crate::Readiness) and [`Drain`](crate::Drain) and the
/// operation carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Reading from or writing to the serial transport failed
    BusError,
    /// A mode line could not be driven
    PinError,
    /// Payload does not fit in one packet; holds the payload length
    PayloadTooLong(usize),
    /// The first byte of a response did not match the expected sentinel
    /// after every permitted attempt
    VerificationFailure {
        /// Sentinel the operation expects in byte 0
        expected: u8,
        /// Byte 0 of the last response, `0x00` if nothing arrived
        received: u8,
    },
}

/// Error type for invalid sub-field values
///
/// Returned when a raw value does not fit in the bit width of the
/// configuration field it is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// The value does not correspond to a valid field setting
    InvalidValue(u8),
}
