//! Bot initialization and identity
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - One-time lookup of the bot's own identity

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tokio::time::sleep;

use crate::core::{config, AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the welcome menu")]
    Start,
    #[command(description = "explain how to create a ticket")]
    Help,
    #[command(description = "abandon the ticket in progress")]
    Cancel,
}

/// Who the bot is, resolved once at startup and shared read-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    /// Username without the leading `@`; empty if the account has none
    pub username: String,
}

impl From<&teloxide::types::Me> for BotIdentity {
    fn from(me: &teloxide::types::Me) -> Self {
        Self {
            id: me.user.id.0,
            username: me.user.username.clone().unwrap_or_default(),
        }
    }
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError::Config)` - Missing token or HTTP client failure
/// * `Err(AppError::Url)` - Invalid BOT_API_URL
pub fn create_bot() -> AppResult<Bot> {
    build_bot(config::BOT_TOKEN.as_str(), config::BOT_API_URL.as_deref())
}

fn build_bot(token: &str, api_url: Option<&str>) -> AppResult<Bot> {
    if token.is_empty() {
        return Err(AppError::Config("BOT_TOKEN environment variable not set".to_string()));
    }

    let client = ClientBuilder::new()
        .timeout(config::network::timeout())
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;
    let bot = Bot::with_client(token, client);

    let bot = match api_url {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            bot.set_api_url(url::Url::parse(bot_api_url)?)
        }
        None => bot,
    };

    Ok(bot)
}

/// Registers the command list shown in the Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Resolves the bot's identity, retrying while the Bot API is still starting up
pub async fn fetch_bot_identity(bot: &Bot) -> AppResult<BotIdentity> {
    let max_retries = config::retry::STARTUP_MAX_RETRIES;
    let mut attempt = 0;

    loop {
        match bot.get_me().await {
            Ok(me) => return Ok(BotIdentity::from(&me)),
            Err(e) => {
                let err_str = e.to_string();
                attempt += 1;
                if attempt >= max_retries || !is_retryable(&err_str) {
                    log::error!("Failed to connect to Bot API after {} attempts: {}", attempt, err_str);
                    return Err(AppError::Telegram(e));
                }

                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in {}s...",
                    attempt,
                    max_retries,
                    err_str,
                    config::retry::STARTUP_RETRY_DELAY_SECS
                );
                sleep(config::retry::startup_delay()).await;
            }
        }
    }
}

fn is_retryable(err: &str) -> bool {
    ["restart", "network", "connection", "timed out", "Connection refused"]
        .iter()
        .any(|needle| err.contains(needle))
}
