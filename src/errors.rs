//! Error types for engine configuration.
//!
//! The engine itself never fails; only loading configuration touches I/O.

use thiserror::Error;

/// Errors that can occur while loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read config: {path}: {message}")]
    Read { path: String, message: String },

    /// The configuration is not valid TOML or has wrongly typed fields.
    #[error("failed to parse config: {path}: {message}")]
    Parse { path: String, message: String },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
