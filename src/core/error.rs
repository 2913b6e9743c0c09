use teloxide::{ApiError, RequestError};
use thiserror::Error;

/// Centralized error type for the application
///
/// Everything that can go wrong while handling a job ends up here, so the
/// orchestrator can turn it into a single user-facing failure notice.
///
/// # Example
///
/// ```
/// use vidrelay::core::error::AppError;
///
/// let err = AppError::Extraction("Unsupported URL: not-a-url".to_string());
/// assert_eq!(err.to_string(), "Unsupported URL: not-a-url");
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The extraction tool could not retrieve or convert the resource
    #[error("{0}")]
    Extraction(String),

    /// Chat platform errors
    #[error("Telegram error: {0}")]
    Transport(#[from] TransportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Chat transport failures, classified by kind
///
/// "Message is not modified" gets its own variant so callers can match on it
/// instead of inspecting error text.
#[derive(Error, Debug)]
pub enum TransportError {
    /// An edit was rejected because the text is already what was requested
    #[error("message is not modified")]
    NotModified,

    /// Any other Bot API failure
    #[error("{0}")]
    Api(RequestError),

    /// Transport failure outside the Bot API (used by non-Telegram transports)
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn is_not_modified(&self) -> bool {
        matches!(self, TransportError::NotModified)
    }
}

impl From<RequestError> for TransportError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(ApiError::MessageNotModified) => TransportError::NotModified,
            other => TransportError::Api(other),
        }
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        AppError::Transport(err.into())
    }
}
