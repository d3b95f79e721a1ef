use std::sync::Arc;

use teloxide::prelude::*;

use saver_core::core::session::SaverService;

use super::settle;
use crate::core::telegram_chat::TelegramChat;

pub async fn handle_link(bot: Bot, msg: Message, service: Arc<SaverService>) -> anyhow::Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let url = text.trim().to_string();

    let sender = msg
        .from
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or("unknown");
    tracing::info!("Media link from {}: {}", sender, url);

    let chat = TelegramChat::new(bot.clone(), msg.chat.id, msg.id);
    let task = tokio::spawn(async move {
        let mut session = service.session(&chat);
        // The session has already told the user how it ended.
        if let Err(e) = session.run(&url).await {
            tracing::debug!("Session ended in {:?}: {}", session.state(), e);
        }
    });

    let outcome = task
        .await
        .map_err(|e| anyhow::anyhow!("session task aborted: {}", e));
    settle(&bot, msg.chat.id, outcome).await
}
