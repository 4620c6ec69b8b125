//! Request pipeline.
//!
//! One inbound message goes through:
//!   validate → workspace + cookies → extract → normalize container
//!   → compress if oversized → upload action → video → cleanup
//!
//! The pipeline never talks to Telegram directly. Replies go through a
//! [`ChatSink`], the download through an [`Extractor`] and compression
//! through a [`Transcoder`], so every step can be driven from tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::conversion::video::{TranscodeOptions, Transcoder};
use crate::core::config::{self, PipelineConfig};
use crate::core::error::{AppError, AppResult, ErrorKind};
use crate::core::messages;
use crate::core::validation::parse_video_url;
use crate::download::artifact::{compressed_path, resolve_container, Artifact};
use crate::download::workspace::RequestWorkspace;
use crate::download::ytdlp::{ExtractOptions, Extractor};

/// Outbound side of a conversation.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_text(&self, text: &str) -> AppResult<()>;

    /// Shows the "sending video" indicator
    async fn send_upload_action(&self) -> AppResult<()>;

    async fn send_video(&self, path: &Path, caption: &str) -> AppResult<()>;
}

/// A single inbound message.
#[derive(Debug, Clone)]
pub struct Request {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
}

impl Request {
    pub fn new(chat_id: i64, message_id: i32, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            text: text.into(),
        }
    }
}

/// What was delivered for a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Path of the uploaded file (already removed by cleanup)
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Whether the file went through the transcoder
    pub compressed: bool,
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Input was not a link; one rejection notice was sent
    Rejected,
    Delivered(Delivery),
    /// Request failed; the fixed message for this kind was sent
    Failed(ErrorKind),
}

/// Runs requests end to end.
pub struct VideoPipeline {
    extractor: Arc<dyn Extractor>,
    transcoder: Arc<dyn Transcoder>,
    transcode_options: TranscodeOptions,
    config: PipelineConfig,
}

impl VideoPipeline {
    pub fn new(extractor: Arc<dyn Extractor>, transcoder: Arc<dyn Transcoder>, config: PipelineConfig) -> Self {
        Self {
            extractor,
            transcoder,
            transcode_options: TranscodeOptions::default(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Handles one message. Never fails: every error is logged in full and
    /// answered with the fixed message for its kind.
    pub async fn handle(&self, sink: &dyn ChatSink, request: &Request, cancel: &CancellationToken) -> Outcome {
        let url = match parse_video_url(&request.text) {
            Ok(url) => url,
            Err(e) => {
                log::info!("chat {}: rejected message: {}", request.chat_id, e);
                if let Err(e) = sink.send_text(messages::REJECT_NOT_URL).await {
                    log::warn!("chat {}: failed to send rejection: {}", request.chat_id, e);
                }
                return Outcome::Rejected;
            }
        };

        log::info!(
            "chat {}: processing {} via {}",
            request.chat_id,
            url,
            self.extractor.name()
        );

        let workspace =
            match RequestWorkspace::create(&self.config.download_root, request.chat_id, request.message_id).await {
                Ok(workspace) => workspace,
                Err(e) => return self.fail(sink, request, e).await,
            };

        let result = self.process(sink, &workspace, &url, cancel).await;
        workspace.cleanup().await;

        match result {
            Ok(delivery) => {
                log::info!(
                    "chat {}: delivered {} ({} bytes, compressed={})",
                    request.chat_id,
                    delivery.path.display(),
                    delivery.size_bytes,
                    delivery.compressed
                );
                Outcome::Delivered(delivery)
            }
            Err(e) => self.fail(sink, request, e).await,
        }
    }

    async fn process(
        &self,
        sink: &dyn ChatSink,
        workspace: &RequestWorkspace,
        url: &Url,
        cancel: &CancellationToken,
    ) -> AppResult<Delivery> {
        let cookies = config::cookies_from_env(&self.config.cookies_var);
        let cookiefile = workspace.stage_cookies(cookies.as_deref()).await?;
        let options = ExtractOptions::for_workspace(workspace.path()).with_cookiefile(cookiefile);

        let reported = self.extractor.extract(url, &options, cancel).await?;
        let path = resolve_container(&reported, &self.config.target_container);
        let mut artifact = Artifact::from_path(path).await?;
        let mut compressed = false;

        log::info!(
            "Extracted {} ({}, {:.1} MB)",
            artifact.path.display(),
            artifact.container,
            artifact.size_mb()
        );
        if artifact.container != self.config.target_container {
            log::warn!(
                "{} is {}, not {}; sending it as is",
                artifact.path.display(),
                artifact.container,
                self.config.target_container
            );
        }

        if artifact.exceeds(self.config.size_threshold_mb) {
            log::info!(
                "{} is {:.1} MB, above {} MB; compressing",
                artifact.path.display(),
                artifact.size_mb(),
                self.config.size_threshold_mb
            );
            if let Err(e) = sink.send_text(messages::COMPRESSING).await {
                log::warn!("Failed to send compression notice: {}", e);
            }

            let output = compressed_path(
                &artifact.path,
                config::compression::OUTPUT_SUFFIX,
                &self.config.target_container,
            );
            let produced = self
                .transcoder
                .transcode(&artifact.path, &output, &self.transcode_options, cancel)
                .await?;

            if let Err(e) = tokio::fs::remove_file(&artifact.path).await {
                log::warn!("Failed to remove original {}: {}", artifact.path.display(), e);
            }
            artifact = Artifact::from_path(produced).await?;
            compressed = true;
        }

        sink.send_upload_action().await?;
        sink.send_video(&artifact.path, &self.config.caption).await?;

        Ok(Delivery {
            path: artifact.path,
            size_bytes: artifact.size_bytes,
            compressed,
        })
    }

    async fn fail(&self, sink: &dyn ChatSink, request: &Request, err: AppError) -> Outcome {
        let kind = err.kind();
        log::error!("chat {}: request failed [{}]: {}", request.chat_id, kind, err);
        if let Err(e) = sink.send_text(kind.user_message()).await {
            log::error!("chat {}: failed to send error notice: {}", request.chat_id, e);
        }
        Outcome::Failed(kind)
    }
}
