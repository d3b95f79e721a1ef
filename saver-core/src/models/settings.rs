use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};

/// Process-wide configuration, built once at startup and shared read-only.
#[derive(Clone)]
pub struct BotSettings {
    pub bot_token: String,
    pub request_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub progress_interval_secs: u64,
    pub ytdlp_path: PathBuf,
    pub resolver_retries: u32,
    pub temp_dir: PathBuf,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_download_timeout_secs() -> u64 {
    600
}

fn default_progress_interval_secs() -> u64 {
    10
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_resolver_retries() -> u32 {
    3
}

impl BotSettings {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            bot_token: token.into(),
            request_timeout_secs: default_request_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            progress_interval_secs: default_progress_interval_secs(),
            ytdlp_path: default_ytdlp_path(),
            resolver_retries: default_resolver_retries(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("BOT_TOKEN не найден! Проверьте файл .env"))?;

        let mut settings = Self::with_token(token);

        if let Some(v) = read_secs(&lookup, "REQUEST_TIMEOUT_SECS")? {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = read_secs(&lookup, "DOWNLOAD_TIMEOUT_SECS")? {
            settings.download_timeout_secs = v;
        }
        if let Some(v) = read_secs(&lookup, "PROGRESS_INTERVAL_SECS")? {
            settings.progress_interval_secs = v;
        }
        if let Some(v) = read_secs(&lookup, "RESOLVER_RETRIES")? {
            settings.resolver_retries = u32::try_from(v).context("RESOLVER_RETRIES is too large")?;
        }
        if let Some(path) = lookup("YTDLP_PATH").filter(|p| !p.trim().is_empty()) {
            settings.ytdlp_path = PathBuf::from(path.trim());
        }
        if let Some(dir) = lookup("TEMP_DIR").filter(|d| !d.trim().is_empty()) {
            settings.temp_dir = PathBuf::from(dir.trim());
        }

        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs)
    }
}

fn read_secs<F>(lookup: &F, key: &str) -> anyhow::Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{key} must be a whole number, got {raw:?}")),
        _ => Ok(None),
    }
}

impl fmt::Debug for BotSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotSettings")
            .field("bot_token", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("progress_interval_secs", &self.progress_interval_secs)
            .field("ytdlp_path", &self.ytdlp_path)
            .field("resolver_retries", &self.resolver_retries)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}
