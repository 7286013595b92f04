//! Governance policy evaluation SDK facade.
//!
//! Depend on this crate via `cargo add mandate`. It bundles the workspace
//! crates behind feature flags so embedders can enable or disable components
//! as needed.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use mandate_primitives as primitives;

/// Profile registry, rule executor, and verdict aggregation (enabled by the
/// `engine` feature).
#[cfg(feature = "engine")]
pub use mandate_engine as engine;

/// Explicit configuration values (enabled by the `config` feature).
#[cfg(feature = "config")]
pub use mandate_config as config;

/// Monitoring cadence and remediation triage planners (enabled by the
/// `planners` feature).
#[cfg(feature = "planners")]
pub use mandate_planners as planners;
