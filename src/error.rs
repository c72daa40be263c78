//! Error types for CycleSense

use thiserror::Error;

use crate::onboarding::{Field, PendingOperation, PairingStatus, StepId, ValidationErrors};

/// Invalid input to the cycle projector.
///
/// Always fatal to the `project` call; never replaced by a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("Invalid input: cycle length must be a positive whole number of days, got {0:?}")]
    InvalidCycleLength(String),

    #[error("Invalid input: malformed date {0:?}")]
    InvalidDate(String),

    #[error("Invalid input: date arithmetic outside the supported calendar range")]
    OutOfRange,
}

/// Failure reported by a [`DevicePairing`](crate::onboarding::DevicePairing) capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{device}: {reason}")]
pub struct PairingError {
    pub device: String,
    pub reason: String,
}

/// Failure reported by a [`ProfileSink`](crate::onboarding::ProfileSink) capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubmissionError(pub String);

/// Errors raised by the onboarding state machine.
///
/// None of these end the session; the caller can correct input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("{0} is in progress")]
    Busy(PendingOperation),

    #[error("Onboarding has already been submitted")]
    AlreadySubmitted,

    #[error("{operation} is not available on step {step}")]
    WrongStep {
        operation: &'static str,
        step: StepId,
    },

    #[error("No device selected")]
    NoDeviceSelected,

    #[error("Device pairing is {0}, expected idle")]
    PairingNotIdle(PairingStatus),

    #[error("Device is not connected")]
    DeviceNotConnected,

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Device connection failed: {0}")]
    DeviceConnection(#[from] PairingError),

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("No {0} is pending")]
    NothingPending(PendingOperation),
}

impl OnboardingError {
    /// Validation message for a single field, if this is a validation failure
    pub fn field_message(&self, field: Field) -> Option<&str> {
        match self {
            OnboardingError::Validation(errors) => errors.get(field),
            _ => None,
        }
    }
}

/// Crate-level error for the stateless entry points (overview, FFI)
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
