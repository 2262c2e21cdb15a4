//! Error types for Commdex Core

use thiserror::Error;

use crate::limits::ValidationError;

/// Result type alias using Commdex's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Commdex error types
#[derive(Error, Debug)]
pub enum Error {
    /// Contradictory or missing setup, detected before any I/O
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
