#![no_std]
//! EBYTE E32 Radio Driver
//!
//! This crate provides a type-safe interface for configuring and driving
//! EBYTE E32 series LoRa transceiver modules. The modules are half-duplex,
//! talk to the host over a plain UART and are switched between operating
//! modes with two GPIO lines.
//!
//! # Features
//! - Mode switching (normal, wake-up, power-down, program) over M0/M1
//! - Reading module identity and configuration
//! - Writing configuration, permanently or until the next power cycle
//! - Firmware reset
//! - Optional AUX ready line, with fixed-delay fallback when not wired
//! - Transparent and fixed-address payload transfer
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface for hardware interaction
//!   - Owns the UART, mode lines, AUX line, delay and clock
//!   - Runs the program mode exchanges and keeps the configuration cache
//!
//! - [`registers`]: Parameter block and its packed registers
//!   - [`Speed`]: UART parity, UART baud rate and air data rate
//!   - [`Options`]: transmission mode, IO drive, wake-up time, FEC, power
//!   - [`Parameters`] and [`ModelInfo`]: the 6-byte blocks the module returns
//!
//! - [`commands`]: Program mode command set and response verification
//!
//! - [`mode`]: Mode line table and mode switching
//! - [`ready`]: AUX ready line handling
//! - [`buffer`]: Stale input draining
//!
//! # Usage
//! Configuration follows a specific sequence:
//!
//! 1. Create a new [`Device`] with your UART, pins, delay and [`Clock`]
//! 2. Call [`Device::init`] to read the model and the current parameters
//! 3. Change the cached [`Parameters`]
//! 4. Save them with [`Device::save_parameters`]
//! 5. Send and receive payloads in normal mode
//!
//! # Important Notes
//! - Configuration is only accepted in program mode; the driver switches
//!   back to normal mode after every exchange
//! - The module never acknowledges a write or reset. Read the parameters
//!   back to confirm a save
//! - A ready line that stays low is not an error; the driver waits for the
//!   timeout and carries on
//! - The UART rate must match the module's UART setting (9600 8N1 from the
//!   factory); program mode always runs at 9600 baud on most modules
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::{InputPin, OutputPin}};
//! use embedded_io::{Read, ReadReady, Write};
//! use ebyte::{AirDataRate, Clock, Device, Error, SaveMode};
//!
//! fn configure_radio<UART, M0, M1, AUX, DELAY, CLOCK>(
//!     device: &mut Device<UART, M0, M1, AUX, DELAY, CLOCK>,
//! ) -> Result<(), Error>
//! where
//!     UART: Read + Write + ReadReady,
//!     M0: OutputPin,
//!     M1: OutputPin,
//!     AUX: InputPin,
//!     DELAY: DelayNs,
//!     CLOCK: Clock,
//! {
//!     device.init()?;
//!
//!     let parameters = device.parameters_mut();
//!     parameters.set_address(0x0102);
//!     parameters.channel = 0x10;
//!     parameters.speed.air_data_rate = AirDataRate::Bps2400;
//!
//!     device.save_parameters(SaveMode::Permanent)?;
//!     device.read_parameters()?;
//!     Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

use regiface::*;

pub mod buffer;
pub mod clock;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod mode;
pub mod ready;
pub mod registers;

pub use buffer::Drain;
pub use clock::Clock;
pub use commands::*;
pub use config::Config;
pub use device::{Device, ProtocolState, MAX_PACKET_LEN};
pub use error::{Error, FieldError};
pub use mode::{Mode, ModeLines};
pub use ready::{NoAux, Readiness};
pub use registers::*;
