//! Error types for configuration loading.

use thiserror::Error;

/// Errors emitted while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading a configuration file.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// Configuration file could not be parsed as YAML.
    #[error("config parse error: {source}")]
    Yaml {
        /// Source [`serde_yaml::Error`].
        #[from]
        source: serde_yaml::Error,
    },
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
