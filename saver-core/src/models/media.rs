use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIB: u64 = 1024 * 1024;

/// What the resolver hands back for one link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub stream_url: String,
    pub title: String,
    pub duration_seconds: u64,
    /// 0 when the source gave no estimate.
    pub approx_size_bytes: u64,
    /// Extractor tag reported by the resolver, e.g. `tiktok`.
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            MediaKind::Video => ".mp4",
            MediaKind::Audio => ".mp3",
        }
    }

    pub fn progress_label(&self) -> &'static str {
        match self {
            MediaKind::Video => "Загружаю видео (макс. качество)",
            MediaKind::Audio => "Загружаю аудио",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
    pub elapsed: Duration,
}

impl DownloadProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => Some(self.bytes_downloaded as f64 / total as f64 * 100.0),
            _ => None,
        }
    }

    pub fn render(&self, label: &str) -> String {
        let mut text = format!("📥 {}\n⏱ {}с", label, self.elapsed.as_secs());
        let downloaded_mb = self.bytes_downloaded / MIB;

        match (self.percent(), self.total_bytes) {
            (Some(percent), Some(total)) => {
                text.push_str(&format!(
                    "\n📊 {:.1}% ({}МБ/{}МБ)",
                    percent,
                    downloaded_mb,
                    total / MIB
                ));
            }
            _ => text.push_str(&format!("\n📊 {}МБ загружено", downloaded_mb)),
        }

        text
    }
}
