//! yt-dlp extraction backend.
//!
//! The pipeline talks to the extractor through the [`Extractor`] trait;
//! [`YtDlpExtractor`] is the production implementation that shells out to
//! the yt-dlp binary. Tests substitute their own implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::process::{last_line, run_with_timeout, stderr_preview, VERSION_CHECK_TIMEOUT};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, get_fix_recommendation};

/// Options handed to the extractor for a single download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Output path template, e.g. `<workspace>/%(title)s.%(ext)s`
    pub output_template: PathBuf,
    /// yt-dlp format selector
    pub format: String,
    /// Download a single item even if the URL points into a playlist
    pub noplaylist: bool,
    /// Container used when video and audio streams are merged
    pub merge_output_format: String,
    /// Suppress progress and warnings
    pub quiet: bool,
    /// Netscape cookie file, if one was staged
    pub cookiefile: Option<PathBuf>,
}

impl ExtractOptions {
    /// Default options writing into `workspace`.
    pub fn for_workspace(workspace: &Path) -> Self {
        Self {
            output_template: workspace.join(config::download::OUTPUT_TEMPLATE),
            format: config::download::FORMAT_SELECTOR.to_string(),
            noplaylist: true,
            merge_output_format: config::download::TARGET_CONTAINER.to_string(),
            quiet: true,
            cookiefile: None,
        }
    }

    pub fn with_cookiefile(mut self, cookiefile: Option<PathBuf>) -> Self {
        self.cookiefile = cookiefile;
        self
    }

    /// Command line for the yt-dlp binary.
    ///
    /// `--print after_move:filepath` makes yt-dlp print the final path once
    /// all post-processing (merge, remux) is done; `--no-simulate` keeps
    /// `--print` from turning the run into a dry run.
    pub fn to_args(&self, url: &Url) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(20);

        if self.noplaylist {
            args.push("--no-playlist".into());
        }
        args.push("--format".into());
        args.push(self.format.clone().into());
        args.push("--merge-output-format".into());
        args.push(self.merge_output_format.clone().into());
        args.push("--output".into());
        args.push(self.output_template.clone().into_os_string());

        if self.quiet {
            args.push("--quiet".into());
            args.push("--no-warnings".into());
            args.push("--no-progress".into());
        }

        args.push("--no-simulate".into());
        args.push("--print".into());
        args.push("after_move:filepath".into());

        if let Some(ref cookies) = self.cookiefile {
            args.push("--cookies".into());
            args.push(cookies.clone().into_os_string());
        }

        args.push("--".into());
        args.push(url.as_str().into());
        args
    }
}

/// Something that turns a URL into a local media file.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Downloads `url` according to `options` and returns the produced file path.
    async fn extract(&self, url: &Url, options: &ExtractOptions, cancel: &CancellationToken) -> AppResult<PathBuf>;
}

/// Extractor backed by the yt-dlp command line tool.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    bin: String,
    timeout: Duration,
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new(config::YTDL_BIN.clone(), config::download::ytdlp_timeout())
    }
}

impl YtDlpExtractor {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(&self, url: &Url, options: &ExtractOptions, cancel: &CancellationToken) -> AppResult<PathBuf> {
        let started = std::time::Instant::now();
        log::info!(
            "Downloading {} (format={}, cookies={})",
            url,
            options.format,
            options.cookiefile.is_some()
        );

        let mut cmd = Command::new(&self.bin);
        cmd.args(options.to_args(url));

        let output = match run_with_timeout("yt-dlp", &mut cmd, self.timeout, cancel).await {
            Ok(output) => output,
            Err(AppError::Io(e)) => {
                return Err(AppError::Extraction(format!("failed to run {}: {}", self.bin, e)));
            }
            Err(e) => return Err(e),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let error_type = analyze_ytdlp_error(&stderr);
            log::error!(
                "yt-dlp failed for {} (exit={:?}, type={:?}): {}",
                url,
                output.status.code(),
                error_type,
                stderr_preview(&output.stderr, 1000)
            );
            log::error!("🔧 {}", get_fix_recommendation(error_type));
            return Err(AppError::Extraction(format!(
                "yt-dlp exited with {:?} ({:?})",
                output.status.code(),
                error_type
            )));
        }

        let path = last_line(&output.stdout)
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Extraction("yt-dlp reported no output file".to_string()))?;

        log::info!("Downloaded {} in {}s", path.display(), started.elapsed().as_secs());
        Ok(path)
    }
}

/// Returns `yt-dlp --version` output, if the binary runs.
pub async fn ytdlp_version(bin: &str) -> Option<String> {
    let mut cmd = Command::new(bin);
    cmd.arg("--version");
    match run_with_timeout("yt-dlp", &mut cmd, VERSION_CHECK_TIMEOUT, &CancellationToken::new()).await {
        Ok(output) if output.status.success() => last_line(&output.stdout),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args_as_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_default_options() {
        let opts = ExtractOptions::for_workspace(Path::new("/data/req-1"));
        assert!(opts.noplaylist);
        assert_eq!(opts.format, "bestvideo[height<=720]+bestaudio/best/best[height<=720]");
        assert_eq!(opts.merge_output_format, "mp4");
        assert_eq!(opts.output_template, PathBuf::from("/data/req-1/%(title)s.%(ext)s"));
        assert!(opts.quiet);
        assert!(opts.cookiefile.is_none());
    }

    #[test]
    fn test_args_without_cookies() {
        let url = Url::parse("https://example.com/watch?v=abc").unwrap();
        let opts = ExtractOptions::for_workspace(Path::new("/w"));
        let args = args_as_strings(&opts.to_args(&url));

        assert_eq!(
            args,
            vec![
                "--no-playlist",
                "--format",
                "bestvideo[height<=720]+bestaudio/best/best[height<=720]",
                "--merge-output-format",
                "mp4",
                "--output",
                "/w/%(title)s.%(ext)s",
                "--quiet",
                "--no-warnings",
                "--no-progress",
                "--no-simulate",
                "--print",
                "after_move:filepath",
                "--",
                "https://example.com/watch?v=abc",
            ]
        );
        assert!(!args.iter().any(|a| a == "--cookies"));
    }

    #[test]
    fn test_args_with_cookies_before_url() {
        let url = Url::parse("https://example.com/v").unwrap();
        let opts = ExtractOptions::for_workspace(Path::new("/w")).with_cookiefile(Some(PathBuf::from("/w/cookies.txt")));
        let args = args_as_strings(&opts.to_args(&url));

        let pos = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[pos + 1], "/w/cookies.txt");
        assert_eq!(args.last().unwrap(), "https://example.com/v");
    }

    #[tokio::test]
    async fn test_extract_missing_binary() {
        let extractor = YtDlpExtractor::new("vidora-no-such-ytdlp", Duration::from_secs(1));
        let url = Url::parse("https://example.com/v").unwrap();
        let err = extractor
            .extract(&url, &ExtractOptions::for_workspace(Path::new("/tmp")), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_version_of_missing_binary() {
        assert!(ytdlp_version("vidora-no-such-ytdlp").await.is_none());
    }
}
