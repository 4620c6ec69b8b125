use std::time::Duration;
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::core::messages;

/// Centralized error type for request handling
///
/// Every failure inside the request pipeline ends up here. The `Display`
/// output carries full detail for logs; users only ever see
/// [`AppError::user_message`], which is fixed per [`ErrorKind`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Input text is not a usable http(s) URL
    #[error("Validation error: {0}")]
    Validation(String),

    /// yt-dlp failed to start, exited non-zero, or produced no file
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// ffmpeg failed to start or exited non-zero
    #[error("Transcode error: {0}")]
    Transcode(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// External process exceeded its time budget and was killed
    #[error("{process} timed out after {after:?}")]
    Timeout { process: String, after: Duration },

    /// Shutdown was requested while an external process was running
    #[error("{0} cancelled by shutdown")]
    Cancelled(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (missing token, bad URL in env, ...)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Stable error categories used for logging and user replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Extraction,
    Transcode,
    Upload,
    Timeout,
    Cancelled,
    Internal,
}

impl ErrorKind {
    /// Fixed user-facing text for this kind
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Validation => messages::REJECT_NOT_URL,
            ErrorKind::Extraction => messages::ERROR_EXTRACTION,
            ErrorKind::Transcode => messages::ERROR_TRANSCODE,
            ErrorKind::Upload => messages::ERROR_UPLOAD,
            ErrorKind::Timeout => messages::ERROR_TIMEOUT,
            ErrorKind::Cancelled => messages::ERROR_CANCELLED,
            ErrorKind::Internal => messages::ERROR_INTERNAL,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Extraction(_) => ErrorKind::Extraction,
            AppError::Transcode(_) => ErrorKind::Transcode,
            AppError::Telegram(_) => ErrorKind::Upload,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Cancelled(_) => ErrorKind::Cancelled,
            AppError::Io(_) | AppError::Config(_) => ErrorKind::Internal,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}
