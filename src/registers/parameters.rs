//! Parameter and identity blocks
//!
//! The module exposes its whole configuration as one 6-byte block:
//!
//! | Byte | Content |
//! |---|---|
//! | 0 | Head: save mode on write, `0xC0` echo on read |
//! | 1 | Address high byte |
//! | 2 | Address low byte |
//! | 3 | [`Speed`] register |
//! | 4 | Channel |
//! | 5 | [`Options`] register |
//!
//! Identity is read through a separate 6-byte block holding the model,
//! firmware version and feature byte.

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

use super::{Options, Speed};

/// Head byte selecting how long written parameters live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveMode {
    /// Parameters are kept across power cycles
    Permanent = 0xC0,
    /// Parameters are lost at the next power-down
    Temporary = 0xC2,
}

impl From<SaveMode> for u8 {
    fn from(mode: SaveMode) -> Self {
        mode as u8
    }
}

/// Cached module configuration
///
/// Created zeroed; filled by a successful parameter read or by the
/// application through the setters. Nothing reaches the module until it is
/// saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameters {
    /// Byte 0 of the last block read (`0xC0` for a valid read)
    pub head: u8,
    /// Module address, high byte
    pub address_high: u8,
    /// Module address, low byte
    pub address_low: u8,
    /// UART and air rate settings
    pub speed: Speed,
    /// Radio channel
    pub channel: u8,
    /// Transmission, drive, wake-up, FEC and power settings
    pub options: Options,
}

impl Parameters {
    /// Returns the 16-bit module address
    pub fn address(&self) -> u16 {
        u16::from_be_bytes([self.address_high, self.address_low])
    }

    /// Splits a 16-bit address into the high and low address bytes
    pub fn set_address(&mut self, address: u16) {
        [self.address_high, self.address_low] = address.to_be_bytes();
    }

    /// Packed speed register
    pub fn speed_byte(&self) -> u8 {
        self.speed.into()
    }

    /// Replaces every speed sub-field from a packed byte
    pub fn set_speed_byte(&mut self, byte: u8) {
        self.speed = byte.into();
    }

    /// Packed options register
    pub fn options_byte(&self) -> u8 {
        self.options.into()
    }

    /// Replaces every options sub-field from a packed byte
    pub fn set_options_byte(&mut self, byte: u8) {
        self.options = byte.into();
    }

    /// Builds the 6-byte write frame starting with `head`
    ///
    /// `head` is normally a [`SaveMode`]; any other byte is sent as given.
    pub fn frame(&self, head: impl Into<u8>) -> [u8; 6] {
        let mut frame = match self.to_bytes() {
            Ok(bytes) => bytes,
            Err(never) => match never {},
        };
        frame[0] = head.into();
        frame
    }
}

impl From<[u8; 6]> for Parameters {
    fn from(bytes: [u8; 6]) -> Self {
        Self {
            head: bytes[0],
            address_high: bytes[1],
            address_low: bytes[2],
            speed: bytes[3].into(),
            channel: bytes[4],
            options: bytes[5].into(),
        }
    }
}

impl FromByteArray for Parameters {
    type Error = Infallible;
    type Array = [u8; 6];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(bytes.into())
    }
}

impl ToByteArray for Parameters {
    type Error = Infallible;
    type Array = [u8; 6];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.head,
            self.address_high,
            self.address_low,
            self.speed_byte(),
            self.channel,
            self.options_byte(),
        ])
    }
}

/// Module identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModelInfo {
    /// Byte 0 of the last block read (`0xC3` for a valid read)
    pub head: u8,
    /// Model number, e.g. `0x32` for an E32
    pub model: u8,
    /// Firmware version
    pub version: u8,
    /// Feature byte (vendor specific)
    pub features: u8,
}

impl From<[u8; 6]> for ModelInfo {
    fn from(bytes: [u8; 6]) -> Self {
        // Bytes 4 and 5 are reserved
        Self {
            head: bytes[0],
            model: bytes[1],
            version: bytes[2],
            features: bytes[3],
        }
    }
}

impl FromByteArray for ModelInfo {
    type Error = Infallible;
    type Array = [u8; 6];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(bytes.into())
    }
}
