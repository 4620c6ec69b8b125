//! Configuration constants for the bot

use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
/// Empty when neither is set; startup refuses to continue in that case
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server URL (local Bot API server)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Cached ffmpeg binary path
/// Read once at startup from FFMPEG_BIN environment variable or defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Name of the variable that carries raw cookie-file contents for yt-dlp.
/// Read on every request, never cached.
pub const COOKIES_ENV_VAR: &str = "YTDL_COOKIES";

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: vidora.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "vidora.log".to_string()));

/// Reads the cookie blob for the current request from `var`.
///
/// Returns `None` when the variable is unset or empty.
pub fn cookies_from_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.is_empty())
}

/// Download folder with `~` expanded.
pub fn download_root() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DOWNLOAD_FOLDER.as_str()).to_string())
}

fn env_secs(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using {}s", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Download configuration
pub mod download {
    use super::{env_secs, Duration, Lazy};

    /// Container the extractor is asked to merge into
    pub const TARGET_CONTAINER: &str = "mp4";

    /// Format selector: best ≤720p video + best audio, then best, then best ≤720p
    pub const FORMAT_SELECTOR: &str = "bestvideo[height<=720]+bestaudio/best/best[height<=720]";

    /// Output file name template inside the request workspace
    pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

    /// Timeout for yt-dlp downloads (in seconds)
    pub static YTDLP_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| env_secs("DOWNLOAD_TIMEOUT_SECS", 1800));

    /// yt-dlp download timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(*YTDLP_TIMEOUT_SECS)
    }
}

/// Compression configuration
pub mod compression {
    use super::{env_secs, Duration, Lazy};

    /// Files above this size are transcoded before upload.
    /// Stays under the 2 GB platform cap with margin.
    pub const SIZE_THRESHOLD_MB: f64 = 1900.0;

    /// Vertical scale to 720p, width follows aspect ratio (even)
    pub const SCALE_FILTER: &str = "scale=-2:720";

    pub const VIDEO_CODEC: &str = "libx264";
    pub const VIDEO_BITRATE: &str = "2000k";
    pub const PRESET: &str = "fast";
    pub const AUDIO_CODEC: &str = "aac";
    pub const AUDIO_BITRATE: &str = "128k";

    /// Suffix appended to the file stem of the compressed variant
    pub const OUTPUT_SUFFIX: &str = "_compressed";

    /// Timeout for ffmpeg transcoding (in seconds)
    pub static FFMPEG_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| env_secs("TRANSCODE_TIMEOUT_SECS", 7200));

    /// ffmpeg transcode timeout duration
    pub fn ffmpeg_timeout() -> Duration {
        Duration::from_secs(*FFMPEG_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for 2 GB uploads through a local Bot API server
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Settings the request pipeline needs, resolved once at startup.
///
/// Built from the statics above in production; tests construct it directly
/// so they never depend on process environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub download_root: PathBuf,
    pub size_threshold_mb: f64,
    pub target_container: String,
    pub caption: String,
    /// Environment variable holding the cookie blob
    pub cookies_var: String,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            download_root: download_root(),
            size_threshold_mb: compression::SIZE_THRESHOLD_MB,
            target_container: download::TARGET_CONTAINER.to_string(),
            caption: crate::core::messages::VIDEO_CAPTION.to_string(),
            cookies_var: COOKIES_ENV_VAR.to_string(),
        }
    }

    /// Config rooted at an arbitrary directory, everything else default
    pub fn with_root(download_root: impl Into<PathBuf>) -> Self {
        Self {
            download_root: download_root.into(),
            ..Self::from_env()
        }
    }
}
