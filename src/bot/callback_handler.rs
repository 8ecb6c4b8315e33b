//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

// Import dialogue types
use crate::dialogue::ChatDialogue;

use super::dialogue_manager::{InboundEvent, Incoming, InteractionManager};
use super::message_handler::handle_incoming;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: ChatDialogue,
    manager: Arc<InteractionManager>,
) -> Result<()> {
    let data = q.data.clone().unwrap_or_default();
    debug!(user_id = %q.from.id, data = %data, "Received callback query from user");

    let incoming = Incoming {
        chat: dialogue.chat_id(),
        language_code: q.from.language_code.clone(),
        event: InboundEvent::Callback {
            id: q.id.clone(),
            data,
        },
    };
    handle_incoming(bot, dialogue, &manager, incoming).await
}
