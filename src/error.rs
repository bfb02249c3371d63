use thiserror::Error;

use crate::model::EntityKind;

pub type Result<T> = std::result::Result<T, Error>;
pub type ConfigError = Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Type mismatch: repository holds {expected} entities, got {actual}")]
    TypeMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No such command '{command}' in [keys.{category}]")]
    NoSuchCommand { category: String, command: String },

    #[error("No such key: {0}")]
    NoSuchKey(String),

    #[error("Status text is empty")]
    EmptyText,

    #[error("Status text contains invalid characters")]
    InvalidCharacters,

    #[error("Status text is too long ({length} / {max} characters)")]
    TextTooLong { length: usize, max: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    pub fn is_temporary(&self) -> bool {
        matches!(self, Error::HttpError(_) | Error::Timeout(_) | Error::Io(_))
    }

    /// Composition errors are re-prompted in the composer loop instead of
    /// aborting the workflow.
    pub fn is_composition(&self) -> bool {
        matches!(
            self,
            Error::EmptyText | Error::InvalidCharacters | Error::TextTooLong { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::TypeMismatch { .. } => "TYPE_MISMATCH",
            Error::HttpError(_) => "HTTP_ERROR",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::Timeout(_) => "TIMEOUT",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Config(_) => "CONFIG",
            Error::NoSuchCommand { .. } => "NO_SUCH_COMMAND",
            Error::NoSuchKey(_) => "NO_SUCH_KEY",
            Error::EmptyText => "EMPTY_TEXT",
            Error::InvalidCharacters => "INVALID_CHARACTERS",
            Error::TextTooLong { .. } => "TEXT_TOO_LONG",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Invalid(_) => "INVALID",
        }
    }
}
