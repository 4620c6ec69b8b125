use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vidora")]
#[command(author, version, about = "Telegram bot that downloads videos by link and sends them back", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Run the download pipeline locally without Telegram
    Download {
        /// Video URL
        url: String,

        /// Directory to copy the resulting video into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Print yt-dlp and ffmpeg versions and exit
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
