pub mod telegram_chat;
