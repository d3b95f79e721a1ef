use thiserror::Error;

/// Failure reported by a media resolver, already sorted into a kind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Ошибка загрузки: {0}")]
    Failed(String),
    #[error("Видео с Facebook требует авторизации или является приватным: {0}")]
    RequiresAuth(String),
    #[error("Таймаут при получении информации о видео: {0}")]
    TimedOut(String),
    #[error("Некорректный ответ экстрактора: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Таймаут загрузки - сервер слишком медленный")]
    Timeout,
    #[error("Ошибка загрузки: {0}")]
    Network(String),
    #[error("Ошибка записи файла: {0}")]
    Io(#[from] std::io::Error),
}

/// Every way a session can end badly, as seen by the user.
#[derive(Debug, Error)]
pub enum SaverError {
    #[error("unsupported platform")]
    UnsupportedPlatform,
    #[error("Ошибка загрузки: {0}")]
    ResolutionFailed(String),
    #[error("resolution requires authorization: {0}")]
    ResolutionRequiresAuth(String),
    #[error("download timed out")]
    DownloadTimeout,
    #[error("Ошибка загрузки: {0}")]
    DownloadNetworkError(String),
    #[error("Ошибка отправки: {0}")]
    DeliveryFailed(String),
    #[error("{0}")]
    InternalError(String),
}

pub const UNSUPPORTED_PLATFORM_MESSAGE: &str =
    "❌ Неподдерживаемая платформа. Отправьте ссылку из Instagram, TikTok, YouTube или Facebook.";

pub const GENERIC_FAILURE_MESSAGE: &str = "❌ Что-то пошло не так. Пожалуйста, попробуйте позже.";

const TIMEOUT_MESSAGE: &str = "\
❌ Превышено время операции!

Возможные причины:
• Видео очень длинное или в высоком качестве
• Медленное интернет-соединение
• Сервер перегружен

Попробуйте позже или используйте более короткое видео.";

const FACEBOOK_AUTH_MESSAGE: &str = "\
❌ Проблема доступа к видео Facebook!

Видео с Facebook может:
• Требовать авторизации
• Быть приватным или ограниченным
• Требовать специальных разрешений

Попробуйте другое публичное видео или другую платформу.";

const UNPROCESSABLE_MESSAGE: &str = "\
❌ Ошибка обработки видео!

Данный формат видео не поддерживается.
Попробуйте другое видео или используйте другую платформу.";

const TOO_LARGE_NOTE: &str = "\n\n⚠️ Файл слишком большой для Telegram.";

impl SaverError {
    pub fn user_message(&self) -> String {
        match self {
            SaverError::UnsupportedPlatform => UNSUPPORTED_PLATFORM_MESSAGE.to_string(),
            SaverError::ResolutionRequiresAuth(_) => FACEBOOK_AUTH_MESSAGE.to_string(),
            SaverError::DownloadTimeout => TIMEOUT_MESSAGE.to_string(),
            SaverError::InternalError(_) => UNPROCESSABLE_MESSAGE.to_string(),
            SaverError::DeliveryFailed(detail) if is_too_large(detail) => {
                format!("❌ Ошибка: {}{}", self, TOO_LARGE_NOTE)
            }
            SaverError::ResolutionFailed(_)
            | SaverError::DownloadNetworkError(_)
            | SaverError::DeliveryFailed(_) => format!("❌ Ошибка: {}", self),
        }
    }
}

fn is_too_large(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("too large") || lower.contains("413")
}

impl From<ResolveError> for SaverError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Failed(detail) => SaverError::ResolutionFailed(detail),
            ResolveError::RequiresAuth(detail) => SaverError::ResolutionRequiresAuth(detail),
            ResolveError::TimedOut(_) => SaverError::DownloadTimeout,
            ResolveError::Malformed(detail) => SaverError::InternalError(detail),
        }
    }
}

impl From<DownloadError> for SaverError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Timeout => SaverError::DownloadTimeout,
            DownloadError::Network(detail) => SaverError::DownloadNetworkError(detail),
            DownloadError::Io(e) => SaverError::DownloadNetworkError(e.to_string()),
        }
    }
}
