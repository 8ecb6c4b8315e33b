//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

// Import localization
use crate::localization::t_lang;

// Import dialogue types
use crate::dialogue::{ChatDialogue, ChatState};

use crate::session_store::ImageRef;

use super::dialogue_manager::{BotCommand, InboundEvent, Incoming, InteractionManager};
use super::telegram_transport::TelegramTransport;

/// Run one event through the state machine and persist the chat's next state
pub async fn handle_incoming(
    bot: Bot,
    dialogue: ChatDialogue,
    manager: &InteractionManager,
    incoming: Incoming,
) -> Result<()> {
    let state = dialogue.get().await?.unwrap_or_default();
    let transport = TelegramTransport::new(bot, manager.config());

    let next = manager.handle(&transport, state.clone(), incoming).await?;
    debug!(chat_id = %dialogue.chat_id(), from = ?state, to = ?next, "Dialogue transition");

    if next != state {
        match next {
            // Idle chats hold no dialogue entry
            ChatState::Idle => dialogue.exit().await?,
            next => dialogue.update(next).await?,
        }
    }
    Ok(())
}

fn language_code(msg: &Message) -> Option<String> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.clone())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: ChatDialogue,
    manager: Arc<InteractionManager>,
) -> Result<()> {
    let language_code = language_code(&msg);

    let event = if let Some(text) = msg.text() {
        debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");
        match BotCommand::parse(text) {
            Some(command) => InboundEvent::Command(command),
            None => InboundEvent::Text(text.to_string()),
        }
    } else if let Some(photos) = msg.photo() {
        // Telegram lists sizes smallest first
        let Some(largest_photo) = photos.last() else {
            return Ok(());
        };
        InboundEvent::Photo(ImageRef(largest_photo.file.id.0.clone()))
    } else if let Some(doc) = msg.document() {
        match &doc.mime_type {
            Some(mime_type) if mime_type.to_string().starts_with("image/") => {
                debug!(user_id = %msg.chat.id, mime_type = %mime_type, "Received image document from user");
                InboundEvent::Photo(ImageRef(doc.file.id.0.clone()))
            }
            _ => {
                debug!(user_id = %msg.chat.id, "Received non-image document from user");
                bot.send_message(
                    msg.chat.id,
                    t_lang("error-unsupported-document", language_code.as_deref()),
                )
                .await?;
                return Ok(());
            }
        }
    } else {
        debug!(user_id = %msg.chat.id, "Ignoring unsupported message type");
        return Ok(());
    };

    let incoming = Incoming {
        chat: msg.chat.id,
        language_code,
        event,
    };
    handle_incoming(bot, dialogue, &manager, incoming).await
}
