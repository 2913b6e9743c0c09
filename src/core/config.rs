use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Configuration for the bot.
// Read once on first access; `.env` is loaded by `main` before anything here is touched.

/// Bot token
/// Read from TELEGRAM_BOT_TOKEN, BOT_TOKEN or TELOXIDE_TOKEN (first non-empty wins)
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    ["TELEGRAM_BOT_TOKEN", "BOT_TOKEN", "TELOXIDE_TOKEN"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
});

/// Cached yt-dlp binary path
/// Read from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// ffmpeg binary path, only probed by `vidrelay check`
/// yt-dlp locates ffmpeg on its own when recoding
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable, defaults to "downloads"
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<PathBuf> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string());
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Custom Bot API server URL (local telegram-bot-api)
/// Uploads above 50 MB only work through one
pub static BOT_API_URL: Lazy<Option<String>> =
    Lazy::new(|| env::var("BOT_API_URL").ok().filter(|url| !url.trim().is_empty()));

/// Delivery limits
pub mod limits {
    /// Largest file the bot will try to send (2 GiB)
    pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;
}

/// Fixed yt-dlp invocation settings
pub mod ytdlp {
    /// Output template inside the per-job directory
    pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

    /// Best video up to 720p merged with best audio, else the best single stream
    pub const FORMAT: &str = "bestvideo[height<=720]+bestaudio/best";

    /// Container every download is recoded into
    pub const TARGET_CONTAINER: &str = "mp4";
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large because a 2 GiB document upload goes through the same client
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
