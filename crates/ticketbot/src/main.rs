use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tokio::time::sleep;

use ticketbot::cli::{Cli, Commands};
use ticketbot::core::{config, init_logger, install_panic_hook};
use ticketbot::telegram::{create_bot, fetch_bot_identity, schema, setup_bot_commands, HandlerDeps};
use ticketbot::ticket::{DescriptionPolicy, Router, TicketDesk, PREDEFINED_SUBJECTS};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Subjects) => {
            for subject in PREDEFINED_SUBJECTS {
                println!("{}", subject);
            }
            Ok(())
        }
        Some(Commands::Run { webhook, strict }) => {
            start_logging()?;
            log::info!("Running bot (webhook: {}, strict: {})", webhook, strict);
            run_bot(webhook, strict || *config::STRICT_DESCRIPTION_STATE).await
        }
        None => {
            start_logging()?;
            log::info!("No command specified, running bot in default mode");
            run_bot(false, *config::STRICT_DESCRIPTION_STATE).await
        }
    }
}

fn start_logging() -> Result<()> {
    init_logger(&config::LOG_FILE_PATH, &config::LOG_LEVEL)?;
    install_panic_hook();
    Ok(())
}

async fn run_bot(use_webhook: bool, strict: bool) -> Result<()> {
    let bot_init_start = std::time::Instant::now();
    log::info!("Starting bot...");

    let bot = create_bot()?;

    // Resolved once; handlers only ever see this immutable copy
    let identity = fetch_bot_identity(&bot).await?;
    log::info!("Bot username: @{}, Bot ID: {}", identity.username, identity.id);
    if identity.username.is_empty() {
        log::warn!("Bot account has no username; mention detection is disabled");
    }

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let policy = DescriptionPolicy::from_strict_flag(strict);
    log::info!("Description policy: {}", policy);

    let desk = Arc::new(TicketDesk::new(Router::new(identity, policy)));
    let handler = schema(HandlerDeps::new(desk));

    let webhook_url = if use_webhook { config::WEBHOOK_URL.clone() } else { None };
    if use_webhook && webhook_url.is_none() {
        log::warn!("--webhook given but WEBHOOK_URL is not set; falling back to long polling");
    }

    if let Some(url) = webhook_url {
        let url = url::Url::parse(&url)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], *config::WEBHOOK_PORT));
        log::info!("Starting bot in webhook mode at {} (listening on {})", url, addr);

        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url)).await?;
        log::info!("🎉 Bot initialization complete in {:.2}s", bot_init_start.elapsed().as_secs_f64());

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
            )
            .await;

        return Ok(());
    }

    log::info!("Starting bot in long polling mode");
    log::info!("🎉 Bot initialization complete in {:.2}s", bot_init_start.elapsed().as_secs_f64());

    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;
    let mut retry_count = 0;

    // Run the dispatcher, restarting it if the dispatch task panics
    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);
                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
                retry_count += 1;
                let backoff = config::retry::backoff(retry_count);
                log::info!(
                    "Restarting dispatcher in {:?} (attempt {}/{})...",
                    backoff,
                    retry_count,
                    max_retries
                );
                sleep(backoff).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }

        sleep(config::retry::dispatcher_delay()).await;
    }

    Ok(())
}
