//! Mock transcoder
//!
//! Records the ffmpeg command line it would have run and writes a small
//! output file, or fails with a transcode error.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use vidora::conversion::video::{TranscodeOptions, Transcoder};
use vidora::core::error::{AppError, AppResult};

/// Size of the file a successful mock transcode writes
pub const COMPRESSED_SIZE: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct TranscodeCall {
    pub input: PathBuf,
    pub output: PathBuf,
    /// ffmpeg arguments as strings
    pub args: Vec<String>,
}

pub struct MockTranscoder {
    fail: bool,
    calls: Mutex<Vec<TranscodeCall>>,
}

impl MockTranscoder {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<TranscodeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        options: &TranscodeOptions,
        _cancel: &CancellationToken,
    ) -> AppResult<PathBuf> {
        let args = options
            .to_args(input, output)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.calls.lock().unwrap().push(TranscodeCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            args,
        });

        if self.fail {
            return Err(AppError::Transcode("ffmpeg exited with Some(1)".to_string()));
        }

        let file = tokio::fs::File::create(output).await?;
        file.set_len(COMPRESSED_SIZE).await?;
        Ok(output.to_path_buf())
    }
}
