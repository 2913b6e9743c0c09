use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::sync::mpsc;

use vidrelay::cli::{Cli, Commands};
use vidrelay::core::utils::format_size_mb;
use vidrelay::core::{config, init_logger, log_startup_configuration, AppError};
use vidrelay::download::progress::{status_text, ProgressTracker};
use vidrelay::download::ytdlp::probe_version;
use vidrelay::download::{ExtractRequest, Extractor, JobSettings, YtDlpExtractor};
use vidrelay::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, bot creation, missing token).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics from spawned jobs instead of losing them silently
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env must be loaded before the config statics are first read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::Check) => run_check().await,
        Some(Commands::Download { url, output }) => run_cli_download(url, output).await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Starts long polling and serves updates until Ctrl+C
async fn run_bot() -> Result<()> {
    if config::BOT_TOKEN.is_empty() {
        return Err(AppError::Config(
            "bot token not set: export TELEGRAM_BOT_TOKEN (or BOT_TOKEN / TELOXIDE_TOKEN)".to_string(),
        )
        .into());
    }

    fs_err::tokio::create_dir_all(config::DOWNLOAD_FOLDER.as_path()).await?;
    log_startup_configuration();

    let bot = create_bot(&config::BOT_TOKEN)?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let deps = HandlerDeps::new(
        Arc::new(YtDlpExtractor::from_config()),
        Arc::new(JobSettings::from_config()),
    );
    let handler = schema(deps);

    log::info!("🤖 Bot is running...");

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Reports the yt-dlp and ffmpeg versions; fails if yt-dlp is missing
async fn run_check() -> Result<()> {
    let ytdlp_version = probe_version(&config::YTDL_BIN, "--version").await?;
    println!("✅ yt-dlp: {}", ytdlp_version);

    match probe_version(&config::FFMPEG_BIN, "-version").await {
        Ok(version) => println!("✅ ffmpeg: {}", version),
        Err(e) => {
            log::warn!("ffmpeg check failed: {}", e);
            println!("⚠️ ffmpeg: not found ({}), MP4 recoding will fail", config::FFMPEG_BIN.as_str());
        }
    }

    Ok(())
}

/// Runs one extraction locally, printing the same throttled progress the bot shows
async fn run_cli_download(url: String, output: Option<String>) -> Result<()> {
    let output_dir = PathBuf::from(shellexpand::tilde(&output.unwrap_or_else(|| ".".to_string())).into_owned());
    fs_err::tokio::create_dir_all(&output_dir).await?;

    println!("🎬 vidrelay download");
    println!("URL: {}", url);
    println!("Output: {}", output_dir.display());

    let extractor = YtDlpExtractor::from_config();
    let request = ExtractRequest { url, output_dir };

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let printer = async move {
        let mut tracker = ProgressTracker::new();
        while let Some(event) = progress_rx.recv().await {
            if let Some(percent) = tracker.on_event(&event) {
                println!("{}", status_text(percent));
            }
        }
    };

    let (extracted, ()) = tokio::join!(extractor.extract(&request, progress_tx), printer);
    let path = extracted?;

    let size = fs_err::tokio::metadata(&path).await?.len();
    println!("✅ Saved {} ({} MB)", path.display(), format_size_mb(size));
    if size > config::limits::MAX_FILE_SIZE {
        println!("⚠️ File is larger than 2GB and could not be sent on Telegram");
    }

    Ok(())
}
