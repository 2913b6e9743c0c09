//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_start_command, spawn_download_job};
use super::types::{HandlerDeps, HandlerError};
use crate::core::utils::is_command;
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Commands are matched first; any other text message is treated as a URL.
/// Messages without text and unknown commands fall through unhandled.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler(deps.clone()))
        .branch(message_handler(deps))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                match cmd {
                    Command::Start => handle_start_command(bot, &msg, &deps).await,
                }
            }
        },
    ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().filter(|text| !is_command(text)).map(str::to_owned))
        .endpoint(move |bot: Bot, msg: Message, text: String| {
            let deps = deps.clone();
            async move {
                spawn_download_job(bot, msg, text, deps);
                Ok(())
            }
        })
}
