//! Configuration values for the mandate governance engine.
//!
//! Everything here is loaded once by the embedding process from explicit
//! paths and passed by reference into planner calls. Decision functions never
//! read the process environment.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod mappings;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use mappings::{MappingOverride, MappingTarget, MatchSpec, PolicyMappings};
pub use settings::{Defaults, EscalationSettings, MonitoringSettings, Settings};
