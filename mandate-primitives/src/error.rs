//! Shared error definitions for mandate primitive types.

use thiserror::Error;

/// Result alias used throughout the governance workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating primitive governance types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The provided profile reference could not be parsed.
    #[error("invalid profile ref `{value}`: {reason}")]
    InvalidProfileRef {
        /// The offending reference string.
        value: String,
        /// Human-readable reason for rejection.
        reason: &'static str,
    },

    /// System identifier failed validation.
    #[error("invalid system id: {reason}")]
    InvalidSystemId {
        /// Human-readable reason for rejection.
        reason: &'static str,
    },
}
