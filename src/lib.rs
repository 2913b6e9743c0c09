//! vidrelay - Telegram bot that turns video links into MP4 documents
//!
//! A user sends a URL; the bot runs yt-dlp, edits a status message as the
//! download progresses in 10% steps, and sends the result back as a document
//! if it fits under Telegram's 2 GiB limit.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging and small helpers
//! - `download`: Extraction, progress throttling and the job pipeline
//! - `telegram`: Bot setup, dispatcher schema and the chat transport
//! - `cli`: Command line arguments

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use download::{handle_url, JobOutcome, JobSettings, YtDlpExtractor};
pub use telegram::{create_bot, schema, ChatTransport, HandlerDeps, TelegramTransport};
