//! Video compression through ffmpeg
//!
//! Oversized downloads are re-encoded to 720p at a fixed bitrate so they
//! fit under the Telegram upload cap.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::process::{run_with_timeout, stderr_preview};

/// Options for video compression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Video filter, `scale=-2:720` by default
    pub scale_filter: String,
    pub video_codec: String,
    pub video_bitrate: String,
    /// x264 preset (ultrafast … veryslow)
    pub preset: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    /// Move the moov atom to the front for streaming playback
    pub faststart: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        use config::compression::*;
        Self {
            scale_filter: SCALE_FILTER.to_string(),
            video_codec: VIDEO_CODEC.to_string(),
            video_bitrate: VIDEO_BITRATE.to_string(),
            preset: PRESET.to_string(),
            audio_codec: AUDIO_CODEC.to_string(),
            audio_bitrate: AUDIO_BITRATE.to_string(),
            faststart: true,
        }
    }
}

impl TranscodeOptions {
    /// Full ffmpeg argument list for `input` → `output`.
    pub fn to_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());

        for arg in [
            "-vf",
            &self.scale_filter,
            "-c:v",
            &self.video_codec,
            "-b:v",
            &self.video_bitrate,
            "-preset",
            &self.preset,
        ] {
            args.push(arg.into());
        }

        if self.faststart {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }

        for arg in ["-c:a", &self.audio_codec, "-b:a", &self.audio_bitrate] {
            args.push(arg.into());
        }

        args.push(output.as_os_str().to_owned());
        args
    }
}

/// Something that re-encodes a media file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Encodes `input` into `output`. Non-zero exit is an error.
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        options: &TranscodeOptions,
        cancel: &CancellationToken,
    ) -> AppResult<PathBuf>;
}

/// Transcoder backed by the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    bin: String,
    timeout: Duration,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new(config::FFMPEG_BIN.clone(), config::compression::ffmpeg_timeout())
    }
}

impl FfmpegTranscoder {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        options: &TranscodeOptions,
        cancel: &CancellationToken,
    ) -> AppResult<PathBuf> {
        if !input.exists() {
            return Err(AppError::Transcode(format!("input not found: {}", input.display())));
        }

        let started = std::time::Instant::now();
        log::info!(
            "Compressing {} → {} ({}, {} @ {})",
            input.display(),
            output.display(),
            options.scale_filter,
            options.video_codec,
            options.video_bitrate
        );

        let mut cmd = Command::new(&self.bin);
        cmd.args(options.to_args(input, output));

        let result = match run_with_timeout("ffmpeg", &mut cmd, self.timeout, cancel).await {
            Ok(result) => result,
            Err(AppError::Io(e)) => return Err(AppError::Transcode(format!("failed to run {}: {}", self.bin, e))),
            Err(e) => return Err(e),
        };

        if !result.status.success() {
            log::error!(
                "FFmpeg compression error (exit={:?}): {}",
                result.status.code(),
                stderr_preview(&result.stderr, 1000)
            );
            return Err(AppError::Transcode(format!(
                "ffmpeg exited with {:?}",
                result.status.code()
            )));
        }

        log::info!("Compression finished in {}s", started.elapsed().as_secs());
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let opts = TranscodeOptions::default();
        assert_eq!(opts.scale_filter, "scale=-2:720");
        assert_eq!(opts.video_bitrate, "2000k");
        assert_eq!(opts.audio_codec, "aac");
        assert_eq!(opts.audio_bitrate, "128k");
        assert!(opts.faststart);
    }

    #[test]
    fn test_ffmpeg_args() {
        let args: Vec<String> = TranscodeOptions::default()
            .to_args(Path::new("/w/in.mp4"), Path::new("/w/in_compressed.mp4"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-i",
                "/w/in.mp4",
                "-vf",
                "scale=-2:720",
                "-c:v",
                "libx264",
                "-b:v",
                "2000k",
                "-preset",
                "fast",
                "-movflags",
                "+faststart",
                "-c:a",
                "aac",
                "-b:a",
                "128k",
                "/w/in_compressed.mp4",
            ]
        );
    }

    #[test]
    fn test_args_without_faststart() {
        let opts = TranscodeOptions {
            faststart: false,
            ..TranscodeOptions::default()
        };
        let args = opts.to_args(Path::new("a.mp4"), Path::new("b.mp4"));
        assert!(!args.iter().any(|a| a == "-movflags"));
    }

    #[tokio::test]
    async fn test_missing_input_is_transcode_error() {
        let transcoder = FfmpegTranscoder::new("ffmpeg", Duration::from_secs(1));
        let err = transcoder
            .transcode(
                Path::new("/nonexistent/in.mp4"),
                Path::new("/nonexistent/out.mp4"),
                &TranscodeOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transcode(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_transcode_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"not really a video").unwrap();

        let transcoder = FfmpegTranscoder::new("vidora-no-such-ffmpeg", Duration::from_secs(1));
        let err = transcoder
            .transcode(
                &input,
                &dir.path().join("out.mp4"),
                &TranscodeOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transcode(_)));
    }
}
