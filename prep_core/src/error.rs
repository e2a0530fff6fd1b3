//! Error types for the prep_core library.

use crate::validation::ValidationErrors;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for prep_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more form fields failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A shared link could not be turned back into a schedule
    #[error("Invalid link: {0}")]
    Decode(#[from] DecodeError),

    /// The document renderer failed
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Failure to turn a link token back into a `ScheduleInput`.
///
/// `Malformed` means the token never parsed into the flat shareable shape;
/// `Invalid` means it parsed but carried out-of-range values.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed link token: {0}")]
    Malformed(#[from] MalformedToken),

    #[error("link carries invalid schedule data: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl DecodeError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodeError::Malformed(_))
    }
}

/// Ways a token can fail before validation is even attempted
#[derive(Debug, thiserror::Error)]
pub enum MalformedToken {
    #[error("token is empty")]
    Empty,

    #[error("not URL-safe base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unexpected payload shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// A time string that is neither `h:mm AM|PM` nor `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized time of day {input:?}")]
pub struct ClockError {
    pub input: String,
}

/// Failure reported by a document renderer. No partial document is returned.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(String),
}
