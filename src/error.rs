//! # Error Types
//!
//! This module defines the error type used throughout the labelgrid library.
//!
//! Every failure is scoped to one operation. The HTTP layer turns
//! [`LabelError::Validation`], [`LabelError::Configuration`] and
//! [`LabelError::Ingestion`] into flash messages; nothing here is fatal to
//! the process.

use thiserror::Error;

/// Main error type for labelgrid operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// User input is invalid (bad column reference, empty selection, bad import)
    #[error("{0}")]
    Validation(String),

    /// A required piece of configuration is missing (e.g. no template yet)
    #[error("{0}")]
    Configuration(String),

    /// An uploaded file could not be decoded into a dataset
    #[error("File read error: {0}")]
    Ingestion(String),

    /// Index outside the template. Callers treat this as a no-op.
    #[error("Index {index} is out of range for a template of {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    /// QR generation (or another delegated service) failed
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Stored dataset is missing or unreadable
    #[error("{0}")]
    Storage(String),

    /// Listener or server failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LabelError {
    /// Shorthand for a [`LabelError::Validation`] error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand for a [`LabelError::Configuration`] error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
