//! Dispatcher schema

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::convert::incoming_from_message;
use crate::telegram::responder::TelegramResponder;
use crate::ticket::Outcome;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry().branch(message_handler(deps))
}

/// Every message goes through the ticket desk, which owns routing precedence
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            handle_message(&bot, &msg, &deps).await?;
            Ok(())
        }
    })
}

/// Handles one Telegram message.
///
/// Returns `Ok(None)` for messages the ticket flow cannot represent.
/// Delivery failures are returned to the dispatcher's error handler.
pub async fn handle_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<Option<Outcome>, HandlerError> {
    let Some(incoming) = incoming_from_message(msg) else {
        log::debug!("Skipping unsupported message {} in chat {}", msg.id.0, msg.chat.id);
        return Ok(None);
    };

    let responder = TelegramResponder::new(bot.clone());
    match deps.desk.handle(&incoming, &responder).await {
        Ok(outcome) => Ok(Some(outcome)),
        Err(e) => {
            log::error!("Failed to handle message from {}: {}", incoming.key(), e);
            Err(Box::new(e) as HandlerError)
        }
    }
}
