//! Telegram bot integration and handlers

pub mod bot;
pub mod convert;
pub mod handlers;
pub mod responder;

// Re-exports for convenience
pub use bot::{create_bot, fetch_bot_identity, setup_bot_commands, BotIdentity, Command};
pub use handlers::{handle_message, schema, HandlerDeps, HandlerError};
pub use responder::TelegramResponder;
