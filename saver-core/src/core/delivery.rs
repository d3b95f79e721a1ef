use crate::models::media::{MediaKind, ResolvedMedia, MIB};
use crate::platforms::Platform;

/// Telegram refuses bot uploads above this size.
pub const PLATFORM_UPLOAD_LIMIT: u64 = 50 * MIB;

/// Largest file still sent as native video/audio; leaves headroom under
/// [`PLATFORM_UPLOAD_LIMIT`].
pub const RICH_MEDIA_LIMIT: u64 = 45 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    RichMedia,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryDecision {
    pub mode: DeliveryMode,
    pub actual_size_bytes: u64,
}

impl DeliveryDecision {
    pub fn decide(actual_size_bytes: u64) -> Self {
        let mode = if actual_size_bytes > RICH_MEDIA_LIMIT {
            DeliveryMode::Document
        } else {
            DeliveryMode::RichMedia
        };

        Self {
            mode,
            actual_size_bytes,
        }
    }

    pub fn size_mb(&self) -> u64 {
        self.actual_size_bytes / MIB
    }

    pub fn status_text(&self, kind: MediaKind) -> &'static str {
        match (self.mode, kind) {
            (DeliveryMode::Document, _) => "📤 Файл большой, отправляю как документ...",
            (DeliveryMode::RichMedia, MediaKind::Video) => "📤 Отправляю видео...",
            (DeliveryMode::RichMedia, MediaKind::Audio) => "📤 Отправляю аудио...",
        }
    }

    pub fn caption(&self, kind: MediaKind, media: &ResolvedMedia, platform: Platform) -> String {
        let mut caption = match kind {
            MediaKind::Video => format!(
                "🎬 {}\n📺 Из: {}\n⏱ Длительность: {}с\n💾 Размер: {}МБ",
                media.title,
                platform,
                media.duration_seconds,
                self.size_mb()
            ),
            MediaKind::Audio => format!("🎵 Аудио из {}", platform),
        };
        if self.mode == DeliveryMode::Document {
            caption.push_str("\n\nФайл слишком большой для формата видео, отправлен как документ.");
        }
        caption
    }
}

/// Status line shown once the resolver has answered, before the first byte.
pub fn pre_download_status(approx_size_bytes: u64) -> String {
    if approx_size_bytes > RICH_MEDIA_LIMIT {
        format!(
            "⚠️ Видео большое ({}МБ). Это может занять время...\n\nЗагружаю в максимальном качестве...",
            approx_size_bytes / MIB
        )
    } else {
        "📥 Загружаю в максимальном качестве...".to_string()
    }
}
