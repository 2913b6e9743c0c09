//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod status;
pub mod transport;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError, TransportFactory};
pub use status::report_status;
pub use transport::{ChatTransport, TelegramTransport};
