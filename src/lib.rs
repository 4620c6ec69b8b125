//! Vidora - Telegram bot that downloads a video by link and sends it back
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, process supervision, validation
//! - `download`: request workspace, yt-dlp extraction and the request pipeline
//! - `conversion`: ffmpeg compression of oversized videos
//! - `telegram`: Telegram bot integration and handlers

pub mod cli;
pub mod conversion;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, ErrorKind, PipelineConfig};
pub use crate::download::{ChatSink, Outcome, Request, VideoPipeline};
