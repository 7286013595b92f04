//! Core shared types for the mandate governance engine.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod refs;
mod taxonomy;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Addressing types for profiles and evaluated systems.
pub use refs::{ProfileRef, SystemId};
/// Severity/status taxonomy and normalization.
pub use taxonomy::{FindingStatus, Severity, Status, Verdict};
