//! Mock extractor
//!
//! Writes a file of the requested size into the workspace (sparse, so
//! multi-gigabyte artifacts cost nothing) or fails the way yt-dlp would.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use url::Url;

use vidora::core::error::{AppError, AppResult};
use vidora::core::process::run_with_timeout;
use vidora::download::ytdlp::{ExtractOptions, Extractor};

/// What the extractor does when called
#[derive(Debug, Clone)]
pub enum ExtractBehavior {
    /// Create `file_name` of `size_bytes` in the workspace and report it
    Produce { file_name: String, size_bytes: u64 },
    /// Report `reported` but also leave a merged `merged` sibling behind
    ProduceMerged {
        reported: String,
        merged: String,
        size_bytes: u64,
    },
    /// Exit with an extraction error
    Fail(String),
    /// Run a child that outlives `timeout`
    Hang { timeout: Duration },
}

/// One recorded call
#[derive(Debug, Clone)]
pub struct ExtractCall {
    pub url: String,
    pub options: ExtractOptions,
    /// Cookie file contents at the time of the call
    pub cookie_bytes: Option<Vec<u8>>,
}

pub struct MockExtractor {
    behavior: ExtractBehavior,
    calls: Mutex<Vec<ExtractCall>>,
}

impl MockExtractor {
    pub fn new(behavior: ExtractBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn producing(file_name: &str, size_bytes: u64) -> Self {
        Self::new(ExtractBehavior::Produce {
            file_name: file_name.to_string(),
            size_bytes,
        })
    }

    pub fn calls(&self) -> Vec<ExtractCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

async fn write_sized(path: &Path, size_bytes: u64) -> AppResult<()> {
    let file = tokio::fs::File::create(path).await?;
    file.set_len(size_bytes).await?;
    Ok(())
}

fn workspace_of(options: &ExtractOptions) -> PathBuf {
    options
        .output_template
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, url: &Url, options: &ExtractOptions, cancel: &CancellationToken) -> AppResult<PathBuf> {
        let cookie_bytes = match options.cookiefile {
            Some(ref path) => Some(tokio::fs::read(path).await?),
            None => None,
        };
        self.calls.lock().unwrap().push(ExtractCall {
            url: url.to_string(),
            options: options.clone(),
            cookie_bytes,
        });

        let workspace = workspace_of(options);
        match &self.behavior {
            ExtractBehavior::Produce { file_name, size_bytes } => {
                let path = workspace.join(file_name);
                write_sized(&path, *size_bytes).await?;
                Ok(path)
            }
            ExtractBehavior::ProduceMerged {
                reported,
                merged,
                size_bytes,
            } => {
                write_sized(&workspace.join(reported), 16).await?;
                write_sized(&workspace.join(merged), *size_bytes).await?;
                Ok(workspace.join(reported))
            }
            ExtractBehavior::Fail(reason) => Err(AppError::Extraction(reason.clone())),
            ExtractBehavior::Hang { timeout } => {
                let mut cmd = Command::new("sleep");
                cmd.arg("30");
                run_with_timeout("yt-dlp", &mut cmd, *timeout, cancel).await?;
                Err(AppError::Extraction("sleep finished unexpectedly".to_string()))
            }
        }
    }
}
