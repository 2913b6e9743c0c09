//! Command and message endpoints

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::download::pipeline::handle_url;

/// Reply to /start
pub const GREETING: &str = "🤖 Hello! Send me a video link and I will download it as MP4 (up to 2GB).";

/// Handle /start command
pub(super) async fn handle_start_command(bot: Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let transport = deps.transports.for_message(bot, msg);
    transport.send_text(GREETING).await?;
    Ok(())
}

/// Starts a download job for a text message.
///
/// The job runs on its own task so the dispatcher can keep serving updates
/// (including from the same chat) while yt-dlp works.
pub(super) fn spawn_download_job(bot: Bot, msg: Message, url: String, deps: HandlerDeps) {
    let chat_id = msg.chat.id;
    let transport = deps.transports.for_message(bot, &msg);
    let extractor = Arc::clone(&deps.extractor);
    let settings = Arc::clone(&deps.settings);

    tokio::spawn(async move {
        log::info!("Download requested in chat {}: {}", chat_id, url);
        if let Err(e) = handle_url(transport.as_ref(), extractor.as_ref(), &settings, &url).await {
            log::error!("Could not start job in chat {}: {}", chat_id, e);
        }
    });
}
