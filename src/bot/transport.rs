//! Transport seam between the interaction state machine and the messenger.
//!
//! The state machine only ever talks to a [`Transport`]; the Telegram
//! implementation lives in `telegram_transport`, tests use an in-memory one.

use anyhow::Result;
use std::future::Future;
use teloxide::types::{CallbackQueryId, ChatId};

use crate::errors::BotError;
use crate::session_store::ImageRef;

use super::ui_builder::Menu;

/// How a text message should be presented
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    /// Fenced monospace block, used for ASCII art
    Monospace,
}

/// Outbound operations plus image retrieval
pub trait Transport: Send + Sync {
    fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Send `text` with the menu's buttons attached
    fn send_menu(&self, chat: ChatId, text: &str, menu: &Menu) -> impl Future<Output = Result<()>> + Send;

    fn send_photo(&self, chat: ChatId, jpeg: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Acknowledge a button press, optionally with a short notice
    fn answer_callback(
        &self,
        callback_id: &CallbackQueryId,
        text: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Ask the user for a free-text reply
    fn prompt_reply(&self, chat: ChatId, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Fetch the binary content of a previously received image
    fn fetch_image(&self, image: &ImageRef) -> impl Future<Output = Result<Vec<u8>, BotError>> + Send;
}
