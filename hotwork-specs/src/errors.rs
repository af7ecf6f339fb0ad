//! Error types for the spec system.

use thiserror::Error;

/// Errors that can occur during fixture processing.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Error parsing a fixture file.
    #[error("failed to parse fixture: {path}: {message}")]
    Parse { path: String, message: String },

    /// Error loading a fixture file.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// A fixture expectation did not hold.
    #[error("assertion failed: {message}")]
    Assertion { message: String },
}

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;
