//! Register definitions for EBYTE E32 modules
//!
//! The module keeps its whole configuration in a 6-byte parameter block.
//! Two of those bytes are packed registers built from several sub-fields:
//!
//! - [`Speed`]: UART parity, UART baud rate and air data rate
//! - [`Options`]: transmission mode, IO drive, wake-up time, FEC and power
//!
//! Each sub-field is an enum covering every bit pattern of its width, so any
//! byte read from the module decodes, and re-encoding gives back the same
//! byte. Raw values are checked with `TryFrom<u8>`.

mod options;
mod parameters;
mod speed;

pub use options::*;
pub use parameters::*;
pub use speed::*;
