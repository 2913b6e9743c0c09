//! Handler types and dependencies

use std::sync::Arc;

use teloxide::prelude::*;

use crate::download::pipeline::JobSettings;
use crate::download::source::Extractor;
use crate::telegram::transport::{ChatTransport, TelegramTransport};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Picks the transport used to answer an incoming message
pub trait TransportFactory: Send + Sync {
    fn for_message(&self, bot: Bot, msg: &Message) -> Arc<dyn ChatTransport>;
}

/// Answers through the Bot API, threaded under the user's message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyTransports;

impl TransportFactory for ReplyTransports {
    fn for_message(&self, bot: Bot, msg: &Message) -> Arc<dyn ChatTransport> {
        Arc::new(TelegramTransport::replying_to(bot, msg))
    }
}

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub extractor: Arc<dyn Extractor>,
    pub settings: Arc<JobSettings>,
    pub transports: Arc<dyn TransportFactory>,
}

impl HandlerDeps {
    /// Create new handler dependencies that reply through the Bot API
    pub fn new(extractor: Arc<dyn Extractor>, settings: Arc<JobSettings>) -> Self {
        Self {
            extractor,
            settings,
            transports: Arc::new(ReplyTransports),
        }
    }

    pub fn with_transports(mut self, transports: Arc<dyn TransportFactory>) -> Self {
        self.transports = transports;
        self
    }
}
