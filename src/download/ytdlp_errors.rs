//! yt-dlp error analysis
//!
//! Classifies yt-dlp stderr so failures are logged with a category and a
//! hint for the operator. Users never see any of this; they get the fixed
//! extraction message.

/// yt-dlp error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// Cookies are invalid, expired or required
    InvalidCookies,
    /// Site detected automated access
    BotDetection,
    /// Video is private, removed or geo-blocked
    VideoUnavailable,
    /// URL is not handled by any extractor
    UnsupportedUrl,
    /// Network trouble (timeouts, connection resets, DNS)
    NetworkError,
    Unknown,
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("cookies are no longer valid")
        || stderr_lower.contains("cookies have likely been rotated")
        || stderr_lower.contains("sign in to confirm you're not a bot")
        || stderr_lower.contains("please sign in")
        || stderr_lower.contains("use --cookies for the authentication")
        || stderr_lower.contains("login required")
    {
        return YtDlpErrorType::InvalidCookies;
    }

    if stderr_lower.contains("bot detection")
        || stderr_lower.contains("http error 403")
        || stderr_lower.contains("http error 429")
        || stderr_lower.contains("signature extraction failed")
    {
        return YtDlpErrorType::BotDetection;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("not available in your country")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("unsupported url") || stderr_lower.contains("no video formats found") {
        return YtDlpErrorType::UnsupportedUrl;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network is unreachable")
        || stderr_lower.contains("name or service not known")
        || stderr_lower.contains("temporary failure in name resolution")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Operator hint for the log line
pub fn get_fix_recommendation(error_type: YtDlpErrorType) -> &'static str {
    match error_type {
        YtDlpErrorType::InvalidCookies => {
            "cookies missing or expired: export fresh Netscape cookies into YTDL_COOKIES and restart"
        }
        YtDlpErrorType::BotDetection => "site is rate limiting or blocking: refresh cookies or update yt-dlp",
        YtDlpErrorType::VideoUnavailable => "video is private, removed or geo-blocked; nothing to fix",
        YtDlpErrorType::UnsupportedUrl => "yt-dlp has no extractor for this URL",
        YtDlpErrorType::NetworkError => "check outbound connectivity and DNS",
        YtDlpErrorType::Unknown => "see yt-dlp stderr above; make sure yt-dlp is up to date",
    }
}
