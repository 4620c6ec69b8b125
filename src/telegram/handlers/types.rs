//! Handler types and dependencies

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::download::pipeline::VideoPipeline;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub pipeline: Arc<VideoPipeline>,
    /// Cancelled on shutdown; kills in-flight yt-dlp/ffmpeg children
    pub shutdown: CancellationToken,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(pipeline: Arc<VideoPipeline>, shutdown: CancellationToken) -> Self {
        Self { pipeline, shutdown }
    }
}
