//! Outbound side of a conversation.
//!
//! A [`ChatTransport`] is bound to one chat and knows how to send, edit and
//! delete text messages and how to upload a document. The job pipeline only
//! talks to this trait, which keeps it independent of teloxide.

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ReplyParameters};

use crate::core::error::TransportError;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a text message and returns its id.
    async fn send_text(&self, text: &str) -> Result<MessageId, TransportError>;

    /// Replaces the text of a message sent earlier.
    async fn edit_text(&self, message: MessageId, text: &str) -> Result<(), TransportError>;

    async fn delete_message(&self, message: MessageId) -> Result<(), TransportError>;

    /// Uploads a local file as a document with a caption.
    async fn send_document(&self, path: &Path, caption: &str) -> Result<(), TransportError>;
}

/// [`ChatTransport`] for one Telegram chat, replying to the message that started the job.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
}

impl TelegramTransport {
    /// Transport that threads every outgoing message under `msg`.
    pub fn replying_to(bot: Bot, msg: &Message) -> Self {
        Self {
            bot,
            chat_id: msg.chat.id,
            reply_to: Some(msg.id),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, text: &str) -> Result<MessageId, TransportError> {
        let mut request = self.bot.send_message(self.chat_id, text);
        if let Some(reply_to) = self.reply_to {
            request = request.reply_parameters(ReplyParameters::new(reply_to));
        }
        let sent = request.await?;
        Ok(sent.id)
    }

    async fn edit_text(&self, message: MessageId, text: &str) -> Result<(), TransportError> {
        self.bot.edit_message_text(self.chat_id, message, text).await?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageId) -> Result<(), TransportError> {
        self.bot.delete_message(self.chat_id, message).await?;
        Ok(())
    }

    async fn send_document(&self, path: &Path, caption: &str) -> Result<(), TransportError> {
        let mut request = self
            .bot
            .send_document(self.chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption);
        if let Some(reply_to) = self.reply_to {
            request = request.reply_parameters(ReplyParameters::new(reply_to));
        }
        request.await?;
        Ok(())
    }
}
