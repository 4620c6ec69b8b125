//! Download management and processing

pub mod artifact;
pub mod pipeline;
pub mod workspace;
pub mod ytdlp;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use artifact::Artifact;
pub use pipeline::{ChatSink, Delivery, Outcome, Request, VideoPipeline};
pub use workspace::{sweep_stale_workspaces, RequestWorkspace};
pub use ytdlp::{ExtractOptions, Extractor, YtDlpExtractor};
