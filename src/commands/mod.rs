pub mod info;
pub mod media;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use saver_core::core::error::GENERIC_FAILURE_MESSAGE;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Команды:")]
pub enum Command {
    #[command(description = "приветственное сообщение")]
    Start,
    #[command(description = "справка по использованию")]
    Help,
    #[command(description = "возможности бота")]
    Info,
}

pub fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(info::answer),
        )
        .branch(dptree::filter(is_link_message).endpoint(media::handle_link))
}

/// Plain text that is not a command is treated as a link.
fn is_link_message(msg: Message) -> bool {
    msg.text().is_some_and(is_link_text)
}

fn is_link_text(text: &str) -> bool {
    !text.trim().is_empty() && !text.starts_with('/')
}

/// Logs a failure that escaped an endpoint and tells the user something
/// went wrong, so the dispatcher never sees the error.
async fn settle(bot: &Bot, chat_id: ChatId, result: anyhow::Result<()>) -> anyhow::Result<()> {
    if let Err(e) = result {
        tracing::error!("Error: {:#}", e);
        if let Err(e) = bot.send_message(chat_id, GENERIC_FAILURE_MESSAGE).await {
            tracing::warn!("Failed to report error to chat {}: {}", chat_id.0, e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("/start", "anylink_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help", "anylink_bot").unwrap(), Command::Help);
        assert_eq!(Command::parse("/info@anylink_bot", "anylink_bot").unwrap(), Command::Info);
        assert!(Command::parse("/download", "anylink_bot").is_err());
    }

    #[test]
    fn only_plain_text_counts_as_link() {
        assert!(is_link_text("https://www.tiktok.com/@u/video/1"));
        assert!(is_link_text("look at this"));
        assert!(!is_link_text("/start"));
        assert!(!is_link_text("   "));
    }

    #[test]
    fn descriptions_list_every_command() {
        let help = Command::descriptions().to_string();
        for name in ["/start", "/help", "/info"] {
            assert!(help.contains(name), "{name} missing from {help}");
        }
    }
}
