//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PowerHubError`] via `#[from]`.

/// Top-level error shared by the domain and application layers.
#[derive(Debug, thiserror::Error)]
pub enum PowerHubError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

/// A domain invariant was violated by user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device name must not be empty")]
    EmptyName,

    #[error("rated power must be a positive number of watts")]
    NonPositivePower,

    #[error("invalid identifier")]
    InvalidId,
}

/// A lookup did not match any stored record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A power-on request was refused by the admission rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error(
        "the total energy consumption would reach {projected} W, above the limit of {max} W"
    )]
    CapExceeded {
        /// Rated power of the device that asked to be turned on.
        requested: u32,
        /// Power drawn by devices already on.
        current: u64,
        /// Current + requested.
        projected: u64,
        /// Configured cap.
        max: u32,
    },
}
