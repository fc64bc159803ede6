use thiserror::Error;

/// Failure while executing a request, before any status code was seen.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    #[error("{message}")]
    Other { message: String },
}

#[derive(Error, Debug)]
pub enum JokeError {
    #[error("failed to create request for '{url}': {reason}")]
    RequestError { url: String, reason: String },

    #[error("failed to execute request: {0}")]
    TransportError(#[from] TransportError),

    #[error("unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("failed to decode joke: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuildError(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 失敗發生的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Transport,
    Status,
    Decode,
    Configuration,
}

impl JokeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            JokeError::RequestError { .. } => ErrorCategory::Request,
            JokeError::TransportError(_) => ErrorCategory::Transport,
            JokeError::UnexpectedStatus { .. } => ErrorCategory::Status,
            JokeError::DecodeError(_) => ErrorCategory::Decode,
            JokeError::ClientBuildError(_)
            | JokeError::IoError(_)
            | JokeError::ConfigError { .. }
            | JokeError::ConfigValidationError { .. }
            | JokeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status carried by an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            JokeError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            JokeError::TransportError(TransportError::DeadlineExceeded) => true,
            JokeError::TransportError(TransportError::Http(e)) => e.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, JokeError>;
