use std::sync::Arc;

use teloxide::prelude::*;

use saver_core::core::session::SaverService;
use saver_core::core::ytdlp;
use saver_core::platforms::Platform;

pub mod commands;
pub mod core;
pub mod storage;

pub async fn run() -> anyhow::Result<()> {
    let settings = storage::config::load_settings()?;
    let service = Arc::new(SaverService::new(&settings)?);

    // Uploads of large files go through the same client, so its timeout
    // has to cover a whole transfer.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(settings.download_timeout())
        .build()?;
    let bot = Bot::with_client(settings.bot_token.clone(), client);

    if ytdlp::find_ytdlp(&settings.ytdlp_path).await.is_none() {
        tracing::warn!(
            "{} is not runnable; every link will fail until it is installed",
            settings.ytdlp_path.display()
        );
    }

    let platforms: Vec<&str> = Platform::ALL.iter().map(|p| p.display_name()).collect();
    tracing::info!(
        "Bot started: {} via {}, download timeout {}s",
        platforms.join(", "),
        service.resolver_name(),
        settings.download_timeout_secs
    );

    bot.delete_webhook().drop_pending_updates(true).await?;

    Dispatcher::builder(bot, commands::schema())
        .dependencies(dptree::deps![service])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Bot stopped");
    Ok(())
}
