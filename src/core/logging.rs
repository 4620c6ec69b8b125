//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup configuration banner (cookies presence, binaries, folders)

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger is already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    let log_config = ConfigBuilder::new()
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("hyper")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            log_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, log_config, log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup.
///
/// Cookie contents are never logged, only whether the variable is set and
/// how large it is.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🎬 vidora {}", env!("CARGO_PKG_VERSION"));
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("yt-dlp binary:     {}", *config::YTDL_BIN);
    log::info!("ffmpeg binary:     {}", *config::FFMPEG_BIN);
    log::info!("Download folder:   {}", config::download_root().display());
    log::info!("Download timeout:  {}s", *config::download::YTDLP_TIMEOUT_SECS);
    log::info!("Transcode timeout: {}s", *config::compression::FFMPEG_TIMEOUT_SECS);
    log::info!(
        "Compression above: {} MB ({} @ {})",
        config::compression::SIZE_THRESHOLD_MB,
        config::compression::SCALE_FILTER,
        config::compression::VIDEO_BITRATE
    );

    match config::cookies_from_env(config::COOKIES_ENV_VAR) {
        Some(cookies) => {
            log::info!(
                "✅ {}: set ({} bytes), staged per request",
                config::COOKIES_ENV_VAR,
                cookies.len()
            );
            if !cookies.contains("# Netscape HTTP Cookie File") && !cookies.contains("# HTTP Cookie File") {
                log::warn!(
                    "⚠️  {} does not look like a Netscape cookie file; yt-dlp may reject it",
                    config::COOKIES_ENV_VAR
                );
            }
        }
        None => {
            log::info!(
                "ℹ️  {}: not set, downloads run without cookies",
                config::COOKIES_ENV_VAR
            );
        }
    }

    if let Some(ref api_url) = *config::BOT_API_URL {
        log::info!("Bot API URL:       {}", api_url);
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
