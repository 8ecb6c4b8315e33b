use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt};
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use picturebot::bot::{callback_handler, message_handler, InteractionManager};
use picturebot::config::{BotConfig, LogFormat};
use picturebot::dialogue::ChatState;
use picturebot::session_store::InMemorySessionStore;

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env().context("Invalid bot configuration")?;
    init_tracing(config.log_format);

    info!("Starting Picture Telegram Bot");

    // Get bot token from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

    info!(
        menu_variant = ?config.menu_variant,
        ascii_width = config.ascii.width,
        pixel_size = config.pixel_size,
        session_ttl = ?config.session_ttl,
        "Configuration loaded"
    );

    let sessions = Arc::new(InMemorySessionStore::with_ttl(config.session_ttl));
    let manager = Arc::new(InteractionManager::new(sessions, config));

    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .enter_dialogue::<Update, InMemStorage<ChatState>, ChatState>()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<ChatState>::new(), manager])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
