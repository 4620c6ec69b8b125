use anyhow::Result;
use async_trait::async_trait;
use dotenvy::dotenv;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::signal;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use vidora::cli::{Cli, Commands};
use vidora::conversion::{ffmpeg_version, FfmpegTranscoder};
use vidora::core::{config, init_logger, log_startup_configuration, AppResult, PipelineConfig};
use vidora::download::pipeline::{ChatSink, Outcome, Request, VideoPipeline};
use vidora::download::ytdlp::{ytdlp_version, YtDlpExtractor};
use vidora::download::sweep_stale_workspaces;
use vidora::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, missing token, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up global panic handler to catch panics in dispatcher
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env if present, before any config static is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Download { url, output }) => run_cli_download(url, output).await,
        Some(Commands::Check) => run_check().await,
    }
}

fn build_pipeline() -> VideoPipeline {
    VideoPipeline::new(
        Arc::new(YtDlpExtractor::default()),
        Arc::new(FfmpegTranscoder::default()),
        PipelineConfig::from_env(),
    )
}

/// Logs whether yt-dlp and ffmpeg can be executed. Missing tools are not fatal.
async fn check_binaries() {
    match ytdlp_version(&config::YTDL_BIN).await {
        Some(version) => log::info!("✅ yt-dlp {}", version),
        None => log::warn!("⚠️  yt-dlp ({}) is not runnable; downloads will fail", *config::YTDL_BIN),
    }
    match ffmpeg_version(&config::FFMPEG_BIN).await {
        Some(version) => log::info!("✅ {}", version),
        None => log::warn!(
            "⚠️  ffmpeg ({}) is not runnable; oversized videos cannot be compressed",
            *config::FFMPEG_BIN
        ),
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();
    check_binaries().await;

    let pipeline = build_pipeline();
    let root = pipeline.config().download_root.clone();
    tokio::fs::create_dir_all(&root)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create download folder {}: {}", root.display(), e))?;
    sweep_stale_workspaces(&root).await;

    let bot = create_bot()?;

    // Retry while a local Bot API server is still starting up
    let bot_info = {
        let startup_max_retries = 12;
        let mut startup_retry = 0;
        loop {
            match bot.get_me().await {
                Ok(info) => break info,
                Err(e) => {
                    startup_retry += 1;
                    if startup_retry >= startup_max_retries {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} retries: {}",
                            startup_retry,
                            e
                        ));
                    }
                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying in 5 seconds...",
                        startup_retry,
                        startup_max_retries,
                        e
                    );
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username.as_deref(), bot_info.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let shutdown = CancellationToken::new();
    let handler = schema(HandlerDeps::new(Arc::new(pipeline), shutdown.clone()));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(DependencyMap::new())
        .build();

    // Ctrl-C kills running child processes first, then stops the dispatcher
    // once in-flight handlers have replied.
    let shutdown_token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        log::info!("Ctrl-C received, shutting down");
        shutdown.cancel();
        match shutdown_token.shutdown() {
            Ok(done) => done.await,
            Err(e) => log::warn!("Dispatcher shutdown: {:?}", e),
        }
    });

    let listener = Polling::builder(bot).drop_pending_updates().build();
    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Prints pipeline replies to stdout and copies the final video to a directory.
struct ConsoleSink {
    output_dir: PathBuf,
    saved: Mutex<Option<PathBuf>>,
}

#[async_trait]
impl ChatSink for ConsoleSink {
    async fn send_text(&self, text: &str) -> AppResult<()> {
        println!("{}", text);
        Ok(())
    }

    async fn send_upload_action(&self) -> AppResult<()> {
        Ok(())
    }

    async fn send_video(&self, path: &Path, caption: &str) -> AppResult<()> {
        let file_name = path.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("video.mp4"));
        let target = self.output_dir.join(file_name);
        tokio::fs::copy(path, &target).await?;
        println!("{}", caption);
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(target);
        }
        Ok(())
    }
}

/// Run CLI download command
async fn run_cli_download(url: String, output: PathBuf) -> Result<()> {
    println!("🎬 Vidora CLI Download");
    println!("URL: {}", url);

    tokio::fs::create_dir_all(&output).await?;

    let pipeline = build_pipeline();
    let sink = ConsoleSink {
        output_dir: output,
        saved: Mutex::new(None),
    };

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let request = Request::new(0, 0, url);
    match pipeline.handle(&sink, &request, &cancel).await {
        Outcome::Delivered(delivery) => {
            let saved = sink.saved.lock().ok().and_then(|saved| saved.clone());
            if let Some(saved) = saved {
                println!("✅ Saved to {} (compressed: {})", saved.display(), delivery.compressed);
            }
            Ok(())
        }
        Outcome::Rejected => Err(anyhow::anyhow!("not an http(s) link: {}", request.text)),
        Outcome::Failed(kind) => Err(anyhow::anyhow!("download failed ({})", kind)),
    }
}

/// Print tool versions
async fn run_check() -> Result<()> {
    let ytdlp = ytdlp_version(&config::YTDL_BIN).await;
    let ffmpeg = ffmpeg_version(&config::FFMPEG_BIN).await;

    println!("yt-dlp ({}): {}", *config::YTDL_BIN, ytdlp.as_deref().unwrap_or("not found"));
    println!("ffmpeg ({}): {}", *config::FFMPEG_BIN, ffmpeg.as_deref().unwrap_or("not found"));

    if ytdlp.is_none() || ffmpeg.is_none() {
        anyhow::bail!("required tools are missing");
    }
    Ok(())
}
