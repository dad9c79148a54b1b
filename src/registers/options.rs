//! Options register (parameter block byte 5)
//!
//! | Bits | Field |
//! |---|---|
//! | 7 | Fixed transmission enable |
//! | 6 | IO drive mode |
//! | 5:3 | Wireless wake-up time |
//! | 2 | Forward error correction |
//! | 1:0 | Transmit power |

use crate::FieldError;

/// Transmission addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmissionMode {
    /// Payload is broadcast to every module on the same address and channel
    #[default]
    Transparent = 0,
    /// The first three payload bytes select the target address and channel
    Fixed = 1,
}

/// Drive mode of the TXD and AUX outputs (and RXD pull-up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoDriveMode {
    #[default]
    OpenCollector = 0,
    /// TXD and AUX push-pull, RXD pull-up (factory default)
    PushPull = 1,
}

/// Wake-up preamble length used in wake-up mode
///
/// The receiver must use the same value as the transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeupTime {
    /// Factory default
    #[default]
    Ms250 = 0b000,
    Ms500 = 0b001,
    Ms750 = 0b010,
    Ms1000 = 0b011,
    Ms1250 = 0b100,
    Ms1500 = 0b101,
    Ms1750 = 0b110,
    Ms2000 = 0b111,
}

impl WakeupTime {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Ms250,
            0b001 => Self::Ms500,
            0b010 => Self::Ms750,
            0b011 => Self::Ms1000,
            0b100 => Self::Ms1250,
            0b101 => Self::Ms1500,
            0b110 => Self::Ms1750,
            _ => Self::Ms2000,
        }
    }

    /// Wake-up time in milliseconds
    pub fn millis(self) -> u32 {
        250 * (self as u32 + 1)
    }
}

impl TryFrom<u8> for WakeupTime {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b111 {
            return Err(FieldError::InvalidValue(value));
        }
        Ok(Self::from_bits(value))
    }
}

/// Forward error correction switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ForwardErrorCorrection {
    #[default]
    Off = 0,
    /// Factory default
    On = 1,
}

/// Transmit power level
///
/// Absolute output depends on the module variant; for 100 mW parts the
/// levels are 20, 17, 14 and 10 dBm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitPower {
    /// Factory default
    #[default]
    Full = 0b00,
    High = 0b01,
    Medium = 0b10,
    Low = 0b11,
}

impl TransmitPower {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Full,
            0b01 => Self::High,
            0b10 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl TryFrom<u8> for TransmitPower {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b11 {
            return Err(FieldError::InvalidValue(value));
        }
        Ok(Self::from_bits(value))
    }
}

/// Decoded options register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Options {
    /// Transparent or fixed transmission (bit 7)
    pub transmission_mode: TransmissionMode,
    /// Output drive / pull-up mode (bit 6)
    pub io_drive: IoDriveMode,
    /// Wake-up time (bits 5:3)
    pub wakeup_time: WakeupTime,
    /// FEC switch (bit 2)
    pub fec: ForwardErrorCorrection,
    /// Transmit power (bits 1:0)
    pub power: TransmitPower,
}

impl From<u8> for Options {
    fn from(byte: u8) -> Self {
        Self {
            transmission_mode: if byte & 0x80 != 0 {
                TransmissionMode::Fixed
            } else {
                TransmissionMode::Transparent
            },
            io_drive: if byte & 0x40 != 0 {
                IoDriveMode::PushPull
            } else {
                IoDriveMode::OpenCollector
            },
            wakeup_time: WakeupTime::from_bits(byte >> 3),
            fec: if byte & 0x04 != 0 {
                ForwardErrorCorrection::On
            } else {
                ForwardErrorCorrection::Off
            },
            power: TransmitPower::from_bits(byte),
        }
    }
}

impl From<Options> for u8 {
    fn from(options: Options) -> Self {
        ((options.transmission_mode as u8) << 7)
            | ((options.io_drive as u8) << 6)
            | ((options.wakeup_time as u8) << 3)
            | ((options.fec as u8) << 2)
            | options.power as u8
    }
}
