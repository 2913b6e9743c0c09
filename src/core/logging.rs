//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup report of the effective configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the configuration the bot is about to run with
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("📁 DOWNLOAD_FOLDER: {}", config::DOWNLOAD_FOLDER.display());
    log::info!("🎬 YTDL_BIN: {}", config::YTDL_BIN.as_str());
    log::info!(
        "📦 Max file size: {} MB",
        crate::core::utils::format_size_mb(config::limits::MAX_FILE_SIZE)
    );

    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("✅ BOT_API_URL: {}", url),
        None => {
            log::warn!("⚠️  BOT_API_URL: not set, using api.telegram.org");
            log::warn!("   The public Bot API rejects uploads above 50 MB;");
            log::warn!("   run a local telegram-bot-api server to send files up to 2 GB");
        }
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
