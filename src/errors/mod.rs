//! # Error Handling
//!
//! This module provides error handling for the Routeplane translation core.
//! It defines custom error types using `thiserror`.
//!
//! Findings destined for the validation report are not represented here;
//! see [`crate::report`] and [`crate::translator::TranslationError`]. An
//! [`Error`] is returned only when the translation itself cannot produce a
//! result (invalid settings, cancellation).

/// Custom result type for Routeplane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Routeplane translation core
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The translation was cancelled before completion
    #[error("Translation cancelled")]
    Cancelled,

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::config(format!("Validation failed: {}", message))
    }
}
