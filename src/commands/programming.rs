//! Program mode commands
//!
//! Every command is the command byte sent three times in a row. The module
//! only listens for these while both mode lines are high.
//!
//! | Command | Bytes | Response |
//! |---|---|---|
//! | [`ReadParameters`] | `C1 C1 C1` | `C0` + 5 parameter bytes |
//! | [`ReadModel`] | `C3 C3 C3` | `C3` + model, version, features, 2 reserved |
//! | [`Reset`] | `C4 C4 C4` | none |
//!
//! Writing parameters has no fixed command byte: the frame starts with the
//! [`SaveMode`](crate::SaveMode) instead, see
//! [`Parameters::frame`](crate::Parameters::frame).

use regiface::FromByteArray;

use crate::{Command, Error, ModelInfo, NoParameters, Parameters};

/// Head byte of a parameter read response
pub const PARAMETERS_HEAD: u8 = 0xC0;

/// Head byte of a model read response
pub const MODEL_HEAD: u8 = 0xC3;

/// Checks byte 0 of a response against the expected head
fn verify(expected: u8, bytes: &[u8; 6]) -> Result<(), Error> {
    if bytes[0] != expected {
        return Err(Error::VerificationFailure {
            expected,
            received: bytes[0],
        });
    }
    Ok(())
}

/// Verified parameter read response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParametersResponse(pub Parameters);

impl FromByteArray for ParametersResponse {
    type Error = Error;
    type Array = [u8; 6];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        verify(PARAMETERS_HEAD, &bytes)?;
        match Parameters::from_bytes(bytes) {
            Ok(parameters) => Ok(Self(parameters)),
            Err(never) => match never {},
        }
    }
}

/// Verified model read response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelResponse(pub ModelInfo);

impl FromByteArray for ModelResponse {
    type Error = Error;
    type Array = [u8; 6];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        verify(MODEL_HEAD, &bytes)?;
        match ModelInfo::from_bytes(bytes) {
            Ok(model) => Ok(Self(model)),
            Err(never) => match never {},
        }
    }
}

/// ReadParameters command (0xC1)
///
/// Returns the parameter block currently in use.
///
/// # Important Notes
/// - Response head is `0xC0`, not the command byte
/// - Read back after a save to confirm it took effect
#[derive(Debug, Clone)]
pub struct ReadParameters;

impl Command for ReadParameters {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = ParametersResponse;

    fn id() -> Self::IdType {
        0xC1
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// ReadModel command (0xC3)
///
/// Returns the model number, firmware version and feature byte.
///
/// # Important Notes
/// - The first read after power-up is often garbage, retry it
/// - Should be issued before the first parameter read
#[derive(Debug, Clone)]
pub struct ReadModel;

impl Command for ReadModel {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = ModelResponse;

    fn id() -> Self::IdType {
        0xC3
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// Reset command (0xC4)
///
/// Restarts the module's firmware.
///
/// # Important Notes
/// - Clears the module's internal buffers
/// - Does NOT restore factory parameters; save known defaults for that
/// - AUX stays low until the restart completes
#[derive(Debug, Clone)]
pub struct Reset;

impl Command for Reset {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0xC4
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
