// src/error.rs

//! Unified error handling for the claim client.

use std::fmt;

use thiserror::Error;

use crate::models::ProblemDetail;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Bearer token could not be decoded
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// The API answered with a problem-detail body
    #[error("API error {}: {}", .0.status, .0.detail)]
    Api(ProblemDetail),

    /// The API answered with a non-success status and no problem detail
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Field-level validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation requires a signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// Signed-in user lacks the role for an operation
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// A submission is already waiting on the API
    #[error("A case submission is already in progress")]
    SubmissionInFlight,

    /// The same payload already produced a case
    #[error("This case was already submitted as {case_id}")]
    DuplicateSubmission { case_id: String },

    /// A newer lookup replaced this one before it finished
    #[error("Lookup superseded by a newer request")]
    Superseded,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an access error.
    pub fn forbidden(message: impl fmt::Display) -> Self {
        Self::Forbidden(message.to_string())
    }

    /// Whether the error was produced client-side before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
