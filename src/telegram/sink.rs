//! [`ChatSink`] over the Bot API.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile};

use crate::core::error::AppResult;
use crate::download::pipeline::ChatSink;

/// Replies into one Telegram chat.
#[derive(Clone)]
pub struct TelegramChat {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramChat {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ChatSink for TelegramChat {
    async fn send_text(&self, text: &str) -> AppResult<()> {
        self.bot.send_message(self.chat_id, text).await?;
        Ok(())
    }

    async fn send_upload_action(&self) -> AppResult<()> {
        self.bot.send_chat_action(self.chat_id, ChatAction::UploadVideo).await?;
        Ok(())
    }

    async fn send_video(&self, path: &Path, caption: &str) -> AppResult<()> {
        log::info!("Uploading {} to chat {}", path.display(), self.chat_id);
        self.bot
            .send_video(self.chat_id, InputFile::file(path))
            .caption(caption)
            .supports_streaming(true)
            .await?;
        Ok(())
    }
}
