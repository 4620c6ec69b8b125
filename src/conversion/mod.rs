//! Media conversion: shrinking oversized downloads before upload.

pub mod video;

use tokio_util::sync::CancellationToken;

use crate::core::process::{run_with_timeout, VERSION_CHECK_TIMEOUT};

pub use video::{FfmpegTranscoder, TranscodeOptions, Transcoder};

/// Returns the first line of `ffmpeg -version`, if the binary runs.
pub async fn ffmpeg_version(bin: &str) -> Option<String> {
    let mut cmd = tokio::process::Command::new(bin);
    cmd.arg("-version");
    match run_with_timeout("ffmpeg", &mut cmd, VERSION_CHECK_TIMEOUT, &CancellationToken::new()).await {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(str::to_string),
        _ => None,
    }
}
