//! Speed register (parameter block byte 3)
//!
//! Packs the serial link settings between the host and the module together
//! with the over-the-air data rate:
//!
//! | Bits | Field |
//! |---|---|
//! | 7:6 | UART parity |
//! | 5:3 | UART baud rate |
//! | 2:0 | Air data rate |
//!
//! Both ends of a radio link must use the same air data rate. The UART
//! settings only concern the wire between the host and the module.

use crate::FieldError;

/// UART parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// 8 data bits, no parity, 1 stop bit (factory default)
    #[default]
    None8N1 = 0b00,
    /// 8 data bits, odd parity, 1 stop bit
    Odd8O1 = 0b01,
    /// 8 data bits, even parity, 1 stop bit
    Even8E1 = 0b10,
    /// Same as [`Parity::None8N1`]
    None8N1Alt = 0b11,
}

impl Parity {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::None8N1,
            0b01 => Self::Odd8O1,
            0b10 => Self::Even8E1,
            _ => Self::None8N1Alt,
        }
    }
}

impl TryFrom<u8> for Parity {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b11 {
            return Err(FieldError::InvalidValue(value));
        }
        Ok(Self::from_bits(value))
    }
}

/// UART baud rate between host and module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBaudRate {
    #[default]
    Baud1200 = 0b000,
    Baud2400 = 0b001,
    Baud4800 = 0b010,
    /// Factory default
    Baud9600 = 0b011,
    Baud19200 = 0b100,
    Baud38400 = 0b101,
    Baud57600 = 0b110,
    Baud115200 = 0b111,
}

impl UartBaudRate {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Baud1200,
            0b001 => Self::Baud2400,
            0b010 => Self::Baud4800,
            0b011 => Self::Baud9600,
            0b100 => Self::Baud19200,
            0b101 => Self::Baud38400,
            0b110 => Self::Baud57600,
            _ => Self::Baud115200,
        }
    }

    /// Line rate in bits per second
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::Baud1200 => 1_200,
            Self::Baud2400 => 2_400,
            Self::Baud4800 => 4_800,
            Self::Baud9600 => 9_600,
            Self::Baud19200 => 19_200,
            Self::Baud38400 => 38_400,
            Self::Baud57600 => 57_600,
            Self::Baud115200 => 115_200,
        }
    }
}

impl TryFrom<u8> for UartBaudRate {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b111 {
            return Err(FieldError::InvalidValue(value));
        }
        Ok(Self::from_bits(value))
    }
}

/// Over-the-air data rate
///
/// Lower rates reach further. The three top encodings all select 19.2 kbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AirDataRate {
    #[default]
    Bps300 = 0b000,
    Bps1200 = 0b001,
    /// Factory default
    Bps2400 = 0b010,
    Bps4800 = 0b011,
    Bps9600 = 0b100,
    Bps19200 = 0b101,
    Bps19200Alt6 = 0b110,
    Bps19200Alt7 = 0b111,
}

impl AirDataRate {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Bps300,
            0b001 => Self::Bps1200,
            0b010 => Self::Bps2400,
            0b011 => Self::Bps4800,
            0b100 => Self::Bps9600,
            0b101 => Self::Bps19200,
            0b110 => Self::Bps19200Alt6,
            _ => Self::Bps19200Alt7,
        }
    }

    /// Air rate in bits per second
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::Bps300 => 300,
            Self::Bps1200 => 1_200,
            Self::Bps2400 => 2_400,
            Self::Bps4800 => 4_800,
            Self::Bps9600 => 9_600,
            Self::Bps19200 | Self::Bps19200Alt6 | Self::Bps19200Alt7 => 19_200,
        }
    }
}

impl TryFrom<u8> for AirDataRate {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b111 {
            return Err(FieldError::InvalidValue(value));
        }
        Ok(Self::from_bits(value))
    }
}

/// Decoded speed register
///
/// The packed byte is computed from the fields on demand, so it is always
/// the canonical packing of the current settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Speed {
    /// UART parity (bits 7:6)
    pub parity: Parity,
    /// UART baud rate (bits 5:3)
    pub uart_baud: UartBaudRate,
    /// Air data rate (bits 2:0)
    pub air_data_rate: AirDataRate,
}

impl From<u8> for Speed {
    fn from(byte: u8) -> Self {
        Self {
            parity: Parity::from_bits(byte >> 6),
            uart_baud: UartBaudRate::from_bits(byte >> 3),
            air_data_rate: AirDataRate::from_bits(byte),
        }
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        ((speed.parity as u8) << 6) | ((speed.uart_baud as u8) << 3) | speed.air_data_rate as u8
    }
}
