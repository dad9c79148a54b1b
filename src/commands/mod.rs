//! Module command set
//!
//! The E32 is configured over the same UART that carries radio payloads.
//! Commands are only recognised in program mode (M0 and M1 high); in any
//! other mode every byte written is treated as payload.
//!
//! # Command Execution
//! - Switch to program mode and wait for AUX to go high
//! - Drop anything left in the receive buffer
//! - Send the command byte three times
//! - Read the fixed 6-byte response, if the command has one
//! - Check the response head before trusting the content
//! - Switch back to normal mode
//!
//! # Important Notes
//! - The module never acknowledges a parameter write or a reset
//! - AUX is low while the module is busy; without AUX, fixed delays are used
//! - Stale bytes in the host's receive buffer shift the response; always
//!   drain before issuing a command

mod programming;

pub use programming::*;
