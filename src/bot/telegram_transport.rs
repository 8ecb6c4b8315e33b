//! Telegram implementation of the [`Transport`] seam

use anyhow::Result;
use rand::Rng;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, FileId, ForceReply, InputFile, ParseMode};
use tracing::{debug, warn};

use crate::ascii_art::fence_markdown;
use crate::config::{BotConfig, RecoveryConfig};
use crate::errors::BotError;
use crate::session_store::ImageRef;

use super::transport::{TextFormat, Transport};
use super::ui_builder::{build_keyboard, Menu};

/// Sends through a teloxide [`Bot`] and downloads files from the Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    recovery: RecoveryConfig,
    message_limit: usize,
}

impl TelegramTransport {
    pub fn new(bot: Bot, config: &BotConfig) -> Self {
        Self {
            bot,
            recovery: config.recovery.clone(),
            message_limit: config.ascii.message_limit,
        }
    }

    /// One download attempt, without timeout or retry
    async fn download(&self, image: &ImageRef) -> Result<Vec<u8>, BotError> {
        let file = self
            .bot
            .get_file(FileId(image.0.clone()))
            .await
            .map_err(|e| BotError::Download(e.to_string()))?;

        if file.size > self.recovery.max_file_size {
            return Err(BotError::TransformFailure(format!(
                "file is {} bytes, limit is {}",
                file.size, self.recovery.max_file_size
            )));
        }

        let url = format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.bot.token(),
            file.path
        );

        let response = reqwest::get(&url)
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| BotError::Download(e.without_url().to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BotError::Download(e.without_url().to_string()))?;

        Ok(bytes.to_vec())
    }
}

impl Transport for TelegramTransport {
    async fn send_text(&self, chat: ChatId, text: &str, format: TextFormat) -> Result<()> {
        match format {
            TextFormat::Plain => {
                self.bot.send_message(chat, text).await?;
            }
            TextFormat::Monospace => {
                self.bot
                    .send_message(chat, fence_markdown(text, self.message_limit))
                    .parse_mode(ParseMode::MarkdownV2)
                    .await?;
            }
        }
        Ok(())
    }

    async fn send_menu(&self, chat: ChatId, text: &str, menu: &Menu) -> Result<()> {
        self.bot
            .send_message(chat, text)
            .reply_markup(build_keyboard(menu))
            .await?;
        Ok(())
    }

    async fn send_photo(&self, chat: ChatId, jpeg: Vec<u8>) -> Result<()> {
        self.bot
            .send_photo(chat, InputFile::memory(jpeg).file_name("result.jpg"))
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &CallbackQueryId, text: Option<&str>) -> Result<()> {
        let mut request = self.bot.answer_callback_query(callback_id.clone());
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }

    async fn prompt_reply(&self, chat: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(chat, text)
            .reply_markup(ForceReply::new())
            .await?;
        Ok(())
    }

    async fn fetch_image(&self, image: &ImageRef) -> Result<Vec<u8>, BotError> {
        let mut attempt = 0u32;
        loop {
            let result = match tokio::time::timeout(
                self.recovery.operation_timeout(),
                self.download(image),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(BotError::Download(format!(
                    "timed out after {}s",
                    self.recovery.operation_timeout_secs
                ))),
            };

            match result {
                Ok(bytes) => {
                    debug!(file_id = %image, bytes = bytes.len(), attempt, "Image downloaded");
                    return Ok(bytes);
                }
                Err(BotError::Download(msg)) if attempt < self.recovery.max_retries => {
                    attempt += 1;
                    let backoff = self.recovery.retry_delay(attempt);
                    let jitter_ms = rand::thread_rng().gen_range(0..=backoff.as_millis() as u64 / 2);
                    let delay = backoff + Duration::from_millis(jitter_ms);
                    warn!(
                        file_id = %image,
                        attempt,
                        error = %msg,
                        delay_ms = delay.as_millis() as u64,
                        "Image download failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
