//! Dialogue Manager module: the per-chat interaction state machine.
//!
//! Sequences photo receipt → menu selection → optional sub-menu or prompt →
//! transformation → delivery. Transport-agnostic: everything outbound goes
//! through a [`Transport`], the chat's state comes in and goes out by value.

use anyhow::Result;
use std::sync::Arc;
use teloxide::types::{CallbackQueryId, ChatId};
use tracing::{debug, info, warn};

use crate::ascii_art::{self, Ramp};
use crate::config::BotConfig;
use crate::dialogue::{ChatState, Continuation, SubMenu};
use crate::errors::BotError;
use crate::localization::{t_args_lang, t_lang};
use crate::session_store::{ImageRef, SessionStore};
use crate::transforms::{self, Axis, PhotoEffect};

use super::actions::MenuAction;
use super::transport::{TextFormat, Transport};
use super::ui_builder::{ascii_charset_menu, main_menu, reflection_menu};

/// Static commands answered with the usage message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
}

impl BotCommand {
    /// Parse `/start`, `/help` and their `@botname` forms
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        let command = command.split('@').next().unwrap_or(command);
        match command.to_lowercase().as_str() {
            "start" => Some(BotCommand::Start),
            "help" => Some(BotCommand::Help),
            _ => None,
        }
    }

    fn message_key(self) -> &'static str {
        match self {
            BotCommand::Start => "welcome",
            BotCommand::Help => "help",
        }
    }
}

/// Inbound event kinds
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    Command(BotCommand),
    Photo(ImageRef),
    /// Button press with the query id and the raw callback data
    Callback { id: CallbackQueryId, data: String },
    Text(String),
}

/// An event together with the chat it belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Incoming {
    pub chat: ChatId,
    pub language_code: Option<String>,
    pub event: InboundEvent,
}

/// Drives every chat's interaction against a session store
pub struct InteractionManager {
    sessions: Arc<dyn SessionStore>,
    config: BotConfig,
}

impl InteractionManager {
    pub fn new(sessions: Arc<dyn SessionStore>, config: BotConfig) -> Self {
        Self { sessions, config }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    /// Handle one event for a chat in `state` and return the chat's next state.
    ///
    /// Interaction failures (no image, bad image, degenerate geometry) are
    /// reported to the user and leave the state unchanged. Only transport
    /// failures are returned as errors.
    pub async fn handle<T: Transport>(
        &self,
        transport: &T,
        state: ChatState,
        incoming: Incoming,
    ) -> Result<ChatState> {
        let Incoming {
            chat,
            language_code,
            event,
        } = incoming;
        let language_code = language_code.as_deref();

        match event {
            InboundEvent::Command(command) => {
                debug!(chat_id = %chat, command = ?command, "Received command");
                transport
                    .send_text(chat, &t_lang(command.message_key(), language_code), TextFormat::Plain)
                    .await?;
                Ok(state)
            }
            InboundEvent::Photo(image) => {
                info!(chat_id = %chat, file_id = %image, "Received photo, presenting menu");
                self.sessions.put(chat, image);
                transport
                    .send_menu(
                        chat,
                        &t_lang("menu-photo-received", language_code),
                        &main_menu(self.config.menu_variant, language_code),
                    )
                    .await?;
                Ok(ChatState::AwaitingChoice)
            }
            InboundEvent::Callback { id, data } => {
                self.handle_callback(transport, chat, language_code, state, &id, &data)
                    .await
            }
            InboundEvent::Text(text) => match state.pending_continuation() {
                Some(Continuation::AsciiRamp) => {
                    let outcome = self
                        .render_ascii(transport, chat, Ramp::from_user_text(&text))
                        .await
                        .map(|()| ChatState::Idle);
                    self.settle(transport, chat, language_code, state, outcome)
                        .await
                }
                None => {
                    debug!(chat_id = %chat, state = ?state, "Ignoring free text outside a prompt");
                    Ok(state)
                }
            },
        }
    }

    async fn handle_callback<T: Transport>(
        &self,
        transport: &T,
        chat: ChatId,
        language_code: Option<&str>,
        state: ChatState,
        callback_id: &CallbackQueryId,
        data: &str,
    ) -> Result<ChatState> {
        let action = match self.parse_action(data) {
            Ok(action) => action,
            Err(e) => {
                debug!(chat_id = %chat, error = %e, "Ignoring callback");
                transport.answer_callback(callback_id, None).await?;
                return Ok(state);
            }
        };

        if let Err(e) = self.sessions.get(chat) {
            transport.answer_callback(callback_id, None).await?;
            return self
                .settle(transport, chat, language_code, state, Err(e.into()))
                .await;
        }

        let pixel_size = self.config.pixel_size.to_string();
        let notice = action.progress_key().map(|key| match action {
            MenuAction::Pixelate => t_args_lang(key, &[("size", pixel_size.as_str())], language_code),
            _ => t_lang(key, language_code),
        });
        transport
            .answer_callback(callback_id, notice.as_deref())
            .await?;

        info!(chat_id = %chat, action = ?action, "Handling menu action");
        let outcome = self
            .run_action(transport, chat, language_code, action)
            .await;
        self.settle(transport, chat, language_code, state, outcome)
            .await
    }

    fn parse_action(&self, data: &str) -> Result<MenuAction, BotError> {
        MenuAction::from_tag(data)
            .filter(|action| action.is_available(self.config.menu_variant))
            .ok_or_else(|| BotError::UnknownAction(data.to_string()))
    }

    async fn run_action<T: Transport>(
        &self,
        transport: &T,
        chat: ChatId,
        language_code: Option<&str>,
        action: MenuAction,
    ) -> Result<ChatState> {
        match action {
            MenuAction::Pixelate => {
                self.apply_effect(transport, chat, PhotoEffect::Pixelate(self.config.pixel_size))
                    .await?;
                Ok(ChatState::Idle)
            }
            MenuAction::Invert => {
                self.apply_effect(transport, chat, PhotoEffect::Invert).await?;
                Ok(ChatState::Idle)
            }
            MenuAction::Horizontal => {
                self.apply_effect(transport, chat, PhotoEffect::Reflect(Axis::Horizontal))
                    .await?;
                Ok(ChatState::Idle)
            }
            MenuAction::Vertical => {
                self.apply_effect(transport, chat, PhotoEffect::Reflect(Axis::Vertical))
                    .await?;
                Ok(ChatState::Idle)
            }
            MenuAction::Ascii => {
                transport
                    .send_menu(
                        chat,
                        &t_lang("menu-ascii-prompt", language_code),
                        &ascii_charset_menu(language_code),
                    )
                    .await?;
                Ok(ChatState::AwaitingSubchoice {
                    menu: SubMenu::AsciiCharset,
                })
            }
            MenuAction::Reflection => {
                transport
                    .send_menu(
                        chat,
                        &t_lang("menu-reflection-prompt", language_code),
                        &reflection_menu(language_code),
                    )
                    .await?;
                Ok(ChatState::AwaitingSubchoice {
                    menu: SubMenu::ReflectionAxis,
                })
            }
            MenuAction::DefaultCharset => {
                self.render_ascii(transport, chat, Ramp::default()).await?;
                Ok(ChatState::Idle)
            }
            MenuAction::CustomCharset => {
                transport
                    .prompt_reply(chat, &t_lang("prompt-custom-charset", language_code))
                    .await?;
                Ok(ChatState::AwaitingCustomInput {
                    continuation: Continuation::AsciiRamp,
                })
            }
        }
    }

    /// Turn an action outcome into the next state, reporting interaction
    /// failures to the user and keeping `state` in that case.
    async fn settle<T: Transport>(
        &self,
        transport: &T,
        chat: ChatId,
        language_code: Option<&str>,
        state: ChatState,
        outcome: Result<ChatState>,
    ) -> Result<ChatState> {
        let err = match outcome {
            Ok(next) => return Ok(next),
            Err(err) => err,
        };
        let Some(bot_error) = err.downcast_ref::<BotError>() else {
            return Err(err);
        };

        warn!(chat_id = %chat, error = %bot_error, "Interaction failed");
        if let Some(key) = bot_error.user_message_key() {
            transport
                .send_text(chat, &t_lang(key, language_code), TextFormat::Plain)
                .await?;
        }
        Ok(state)
    }

    async fn fetch_current_image<T: Transport>(&self, transport: &T, chat: ChatId) -> Result<Vec<u8>> {
        let image = self.sessions.get(chat)?;
        Ok(transport.fetch_image(&image).await?)
    }

    async fn apply_effect<T: Transport>(
        &self,
        transport: &T,
        chat: ChatId,
        effect: PhotoEffect,
    ) -> Result<()> {
        let bytes = self.fetch_current_image(transport, chat).await?;
        let quality = self.config.jpeg_quality;

        let jpeg = tokio::task::spawn_blocking(move || {
            transforms::apply_to_bytes(&bytes, effect, quality)
        })
        .await??;

        debug!(chat_id = %chat, effect = ?effect, jpeg_bytes = jpeg.len(), "Sending transformed photo");
        transport.send_photo(chat, jpeg).await
    }

    async fn render_ascii<T: Transport>(&self, transport: &T, chat: ChatId, ramp: Ramp) -> Result<()> {
        let bytes = self.fetch_current_image(transport, chat).await?;
        let settings = self.config.ascii.clone();

        let art = tokio::task::spawn_blocking(move || -> Result<String, BotError> {
            let image = transforms::decode(&bytes)?;
            ascii_art::render(&image, &ramp, &settings)
        })
        .await??;

        debug!(chat_id = %chat, art_chars = art.chars().count(), "Sending ASCII art");
        transport.send_text(chat, &art, TextFormat::Monospace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/help@picture_bot"), Some(BotCommand::Help));
        assert_eq!(BotCommand::parse("/HELP extra words"), Some(BotCommand::Help));
        assert_eq!(BotCommand::parse("start"), None);
        assert_eq!(BotCommand::parse("/stop"), None);
        assert_eq!(BotCommand::parse(""), None);
    }
}
