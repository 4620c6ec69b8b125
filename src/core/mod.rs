//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod process;
pub mod validation;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use logging::{init_logger, log_startup_configuration};
