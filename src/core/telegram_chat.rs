use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ReplyParameters};

use saver_core::core::chat::{AudioTags, ChatSink};

/// One user's conversation, with every outgoing message threaded to the
/// message that carried the link.
pub struct TelegramChat {
    bot: Bot,
    chat_id: ChatId,
    reply_to: MessageId,
}

impl TelegramChat {
    pub fn new(bot: Bot, chat_id: ChatId, reply_to: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            reply_to,
        }
    }

    fn thread(&self) -> ReplyParameters {
        ReplyParameters::new(self.reply_to)
    }
}

#[async_trait]
impl ChatSink for TelegramChat {
    type Status = MessageId;

    async fn post_status(&self, text: &str) -> anyhow::Result<MessageId> {
        let sent = self
            .bot
            .send_message(self.chat_id, text)
            .reply_parameters(self.thread())
            .await?;
        Ok(sent.id)
    }

    async fn edit_status(&self, status: &MessageId, text: &str) -> anyhow::Result<()> {
        self.bot
            .edit_message_text(self.chat_id, *status, text)
            .await?;
        Ok(())
    }

    async fn delete_status(&self, status: &MessageId) -> anyhow::Result<()> {
        self.bot.delete_message(self.chat_id, *status).await?;
        Ok(())
    }

    async fn reply_text(&self, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .reply_parameters(self.thread())
            .await?;
        Ok(())
    }

    async fn send_video(&self, path: &Path, caption: &str) -> anyhow::Result<()> {
        self.bot
            .send_video(self.chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption)
            .supports_streaming(true)
            .reply_parameters(self.thread())
            .await?;
        Ok(())
    }

    async fn send_document(&self, path: &Path, caption: &str) -> anyhow::Result<()> {
        self.bot
            .send_document(self.chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption)
            .reply_parameters(self.thread())
            .await?;
        Ok(())
    }

    async fn send_audio(&self, path: &Path, caption: &str, tags: &AudioTags) -> anyhow::Result<()> {
        self.bot
            .send_audio(self.chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption)
            .title(tags.title.as_str())
            .performer(tags.performer.as_str())
            .reply_parameters(self.thread())
            .await?;
        Ok(())
    }
}
