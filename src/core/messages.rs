//! User-facing texts.
//!
//! Every reply the bot can produce lives here so the wording stays in one
//! place. Error kinds map onto these in [`crate::core::error::ErrorKind`].

pub const GREETING: &str = "👋 Hi! Send me a link to a video and I'll send the video back.\n\n\
    Videos are fetched in up to 720p. Very large files are compressed before sending.";

pub const REJECT_NOT_URL: &str = "❌ Please send a valid link starting with http:// or https://";

pub const COMPRESSING: &str = "⏳ The video is larger than 1900 MB, compressing it. This can take a while...";

pub const VIDEO_CAPTION: &str = "🎬 Here is your video";

pub const ERROR_EXTRACTION: &str = "❌ Could not download this video.\n\nCheck that the link is correct and the video is public.";

pub const ERROR_TRANSCODE: &str = "❌ The video is too large and compressing it failed.";

pub const ERROR_UPLOAD: &str = "❌ Could not send the video to Telegram. Please try again later.";

pub const ERROR_TIMEOUT: &str = "⌛ Processing took too long and was stopped. Please try again later.";

pub const ERROR_CANCELLED: &str = "⚠️ The bot is restarting, the request was stopped. Please send the link again.";

pub const ERROR_INTERNAL: &str = "❌ Something went wrong on our side. Please try again later.";
