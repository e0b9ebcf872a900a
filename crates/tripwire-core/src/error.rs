//! Error types for tripwire-core.
//!
//! Normalization itself is infallible; the only failures this crate defines
//! are a malformed framework version string and a notifier that could not
//! deliver a notice.

use thiserror::Error;

/// A framework version string could not be parsed as `major.minor[.patch]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("framework version is empty")]
    Empty,
    #[error("framework version {0:?} has no minor component")]
    MissingMinor(String),
    #[error("framework version {input:?} has a non-numeric component {component:?}")]
    NonNumeric { input: String, component: String },
}

/// A notifier failed to hand a notice to its backend.
///
/// Returned to the interceptor, which logs it and carries on re-raising the
/// original action failure.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notice delivery failed: {0}")]
    Delivery(String),
    #[error("notifier state is poisoned")]
    Poisoned,
}
