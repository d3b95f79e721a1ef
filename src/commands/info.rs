use teloxide::prelude::*;

use super::{settle, Command};

pub const WELCOME_TEXT: &str = "\
🎬 Добро пожаловать в AnyLink Saver!

Я помогу сохранить видео и музыку из:
• Instagram Reels и постов
• TikTok
• YouTube Shorts и видео
• Facebook видео и Reels

📥 Просто отправь ссылку — и я пришлю:
• Видео в MP4 (максимальное качество)
• Аудио в MP3 (отличное качество)

🚀 Попробуй прямо сейчас — скинь мне любую ссылку!";

pub const HELP_TEXT: &str = "\
📖 Как пользоваться:

Просто отправь мне ссылку из:
• Instagram: https://www.instagram.com/reel/... или https://www.instagram.com/p/...
• TikTok: https://www.tiktok.com/@.../video/...
• YouTube: https://youtube.com/... или https://youtube.com/shorts/...
• Facebook: https://www.facebook.com/.../videos/... или https://fb.watch/...

🎯 Возможности:
• Скачивание видео в максимальном качестве
• Извлечение аудио в MP3
• Отслеживание прогресса загрузки
• Поддержка больших файлов (отправляются как документы)
• Быстрая обработка с оптимизированными настройками

⚙️ Поддерживаемые форматы:
• Видео: MP4 (лучшее доступное качество)
• Аудио: MP3 (высокое качество)

⚠️ Примечание:
• Видео должны быть публичными и доступными
• Максимальный размер: 50MB (ограничение Telegram)
• Видео с Facebook могут требовать авторизацию
• Обработка может занять несколько минут для роликов в высоком качестве

🔧 Команды:
/start – приветственное сообщение
/help – справка по использованию
/info – возможности бота";

pub const INFO_TEXT: &str = "\
🤖 Возможности бота:

📱 Поддерживаемые платформы:
• Instagram — Reels, посты, сторис (публичные)
• TikTok — все публичные видео
• YouTube — видео, Shorts, записи трансляций
• Facebook — публичные видео, Reels, посты

🎬 Варианты загрузки:
• Видео — в максимально доступном качестве (до 4K)
• Аудио — в формате MP3 с метаданными
• Автоматическое определение формата
• Отслеживание прогресса загрузки

⚡ Технические возможности:
• Таймаут на скачивание — до 10 минут для больших файлов
• Автоматическая оптимизация размера файлов
• Обработка ошибок и обратная связь пользователю
• Автоматическая очистка временных файлов

📊 Ограничения:
• Лимит Telegram — до 50MB для видео
• Некоторые Facebook-видео могут требовать входа в аккаунт
• Приватный и возрастной контент не поддерживается
• Контент с региональными ограничениями может быть недоступен

💡 Советы:
• Отправляй прямые ссылки на видео для лучшего результата
• Для Facebook используй только публичные ролики
• Будь терпелив при загрузке больших файлов
• Если возникли проблемы — попробуй позже или обратись в поддержку";

impl Command {
    pub fn text(&self) -> &'static str {
        match self {
            Command::Start => WELCOME_TEXT,
            Command::Help => HELP_TEXT,
            Command::Info => INFO_TEXT,
        }
    }
}

pub async fn answer(bot: Bot, msg: Message, cmd: Command) -> anyhow::Result<()> {
    tracing::debug!("Command {:?} in chat {}", cmd, msg.chat.id.0);
    let sent = bot
        .send_message(msg.chat.id, cmd.text())
        .await
        .map(|_| ())
        .map_err(anyhow::Error::from);
    settle(&bot, msg.chat.id, sent).await
}
