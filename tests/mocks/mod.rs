//! Mock implementations of the pipeline seams
//!
//! Extractor, transcoder and chat sink stand-ins that record what the
//! pipeline asked of them, so tests can run a full request without
//! yt-dlp, ffmpeg or Telegram.

pub mod mock_extractor;
pub mod mock_transcoder;
pub mod recording_sink;

pub use mock_extractor::{ExtractBehavior, ExtractCall, MockExtractor};
pub use mock_transcoder::{MockTranscoder, TranscodeCall};
pub use recording_sink::{RecordingSink, SinkEvent};
