//! Input validation for inbound messages
//!
//! A request is accepted only when the message text is an http(s) link.
//! Anything else is rejected before any filesystem or network work starts.

use thiserror::Error;
use url::Url;

use crate::core::error::AppError;

/// Maximum URL length (RFC 7230 recommends 8000, but we use 2048 for safety)
pub const MAX_URL_LENGTH: usize = 2048;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Text does not start with http:// or https://
    #[error("not an http(s) link: {0:?}")]
    MissingScheme(String),

    /// Starts like a link but does not parse
    #[error("malformed URL {url:?}: {reason}")]
    Malformed { url: String, reason: String },

    /// Parses but has no host to fetch from
    #[error("URL has no host: {0}")]
    NoHost(String),

    #[error("URL is longer than {MAX_URL_LENGTH} characters")]
    TooLong,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Checks that `text` starts with an http(s) scheme prefix, ignoring ASCII case.
pub fn has_http_prefix(text: &str) -> bool {
    let text = text.trim_start();
    ["http://", "https://"].iter().any(|prefix| {
        text.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Validates message text as a video link.
///
/// # Arguments
/// * `text` - Raw message text
///
/// # Returns
/// * `Ok(Url)` - Parsed http(s) URL with a host
/// * `Err(ValidationError)` - Anything else
///
/// # Examples
/// ```
/// use vidora::core::validation::parse_video_url;
///
/// assert!(parse_video_url("https://example.com/watch?v=abc").is_ok());
/// assert!(parse_video_url("  HTTP://example.com/v/1 ").is_ok());
/// assert!(parse_video_url("hello").is_err());
/// assert!(parse_video_url("ftp://example.com/video.mp4").is_err());
/// ```
pub fn parse_video_url(text: &str) -> Result<Url, ValidationError> {
    let text = text.trim();

    if !has_http_prefix(text) {
        return Err(ValidationError::MissingScheme(text.chars().take(64).collect()));
    }

    if text.len() > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong);
    }

    let url = Url::parse(text).map_err(|e| ValidationError::Malformed {
        url: text.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::NoHost(text.to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_http_prefix() {
        assert!(has_http_prefix("https://youtu.be/abc"));
        assert!(has_http_prefix("http://example.com"));
        assert!(has_http_prefix("HTTPS://EXAMPLE.COM"));
        assert!(has_http_prefix("   https://example.com"));
        assert!(!has_http_prefix("watch this https://example.com"));
        assert!(!has_http_prefix("htt"));
        assert!(!has_http_prefix(""));
        assert!(!has_http_prefix("ftp://example.com"));
    }

    #[test]
    fn test_parse_valid_url() {
        let url = parse_video_url("https://example.com/watch?v=abc").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.query(), Some("v=abc"));
    }

    #[test]
    fn test_reject_plain_text() {
        assert_eq!(
            parse_video_url("hello bot"),
            Err(ValidationError::MissingScheme("hello bot".to_string()))
        );
    }

    #[test]
    fn test_reject_malformed() {
        assert!(matches!(
            parse_video_url("https://exa mple.com/"),
            Err(ValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn test_reject_too_long() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(parse_video_url(&long), Err(ValidationError::TooLong));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        assert!(parse_video_url("привет").is_err());
        assert!(!has_http_prefix("ht😀tp://"));
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = ValidationError::TooLong.into();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Validation);
    }
}
