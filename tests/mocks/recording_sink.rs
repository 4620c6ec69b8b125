//! Chat sink that records every outbound event

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use teloxide::{ApiError, RequestError};

use vidora::core::error::{AppError, AppResult};
use vidora::download::pipeline::ChatSink;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Text(String),
    UploadAction,
    Video {
        path: PathBuf,
        caption: String,
        /// Whether the file existed when it was handed over
        existed: bool,
        size_bytes: u64,
    },
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    fail_video: bool,
    /// `send_text` fails for this exact text (not recorded)
    fail_text: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose video upload fails
    pub fn failing_video() -> Self {
        Self {
            fail_video: true,
            ..Self::default()
        }
    }

    /// Sink that cannot deliver `text`
    pub fn failing_text(text: &str) -> Self {
        Self {
            fail_text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn videos(&self) -> Vec<SinkEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, SinkEvent::Video { .. }))
            .collect()
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn send_text(&self, text: &str) -> AppResult<()> {
        if self.fail_text.as_deref() == Some(text) {
            return Err(AppError::Telegram(RequestError::Api(ApiError::BotBlocked)));
        }
        self.events.lock().unwrap().push(SinkEvent::Text(text.to_string()));
        Ok(())
    }

    async fn send_upload_action(&self) -> AppResult<()> {
        self.events.lock().unwrap().push(SinkEvent::UploadAction);
        Ok(())
    }

    async fn send_video(&self, path: &Path, caption: &str) -> AppResult<()> {
        if self.fail_video {
            return Err(AppError::Telegram(RequestError::Api(ApiError::BotBlocked)));
        }
        let metadata = tokio::fs::metadata(path).await.ok();
        self.events.lock().unwrap().push(SinkEvent::Video {
            path: path.to_path_buf(),
            caption: caption.to_string(),
            existed: metadata.is_some(),
            size_bytes: metadata.map(|m| m.len()).unwrap_or(0),
        });
        Ok(())
    }
}
