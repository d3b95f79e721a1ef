use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::ResolveError;
use crate::core::filename::{self, DEFAULT_TITLE};
use crate::core::process;
use crate::models::media::ResolvedMedia;
use crate::models::settings::BotSettings;
use crate::platforms::traits::MediaResolver;

pub async fn find_ytdlp(configured: &Path) -> Option<PathBuf> {
    let status = process::command(configured)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .ok()?;

    status.success().then(|| configured.to_path_buf())
}

/// Resolves page links by asking yt-dlp for the best single-file format,
/// without downloading anything and without credentials.
pub struct YtDlpResolver {
    ytdlp_path: PathBuf,
    retries: u32,
    socket_timeout: Duration,
}

impl YtDlpResolver {
    pub fn new(settings: &BotSettings) -> Self {
        Self {
            ytdlp_path: settings.ytdlp_path.clone(),
            retries: settings.resolver_retries,
            socket_timeout: settings.download_timeout(),
        }
    }

    fn args(&self, url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "-f".to_string(),
            "best".to_string(),
            "--retries".to_string(),
            self.retries.to_string(),
            "--socket-timeout".to_string(),
            self.socket_timeout.as_secs().to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl MediaResolver for YtDlpResolver {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<ResolvedMedia, ResolveError> {
        tracing::debug!("[yt-dlp] resolving {}", url);

        // Overall allowance on top of yt-dlp's own per-socket timeout.
        let run = process::command(&self.ytdlp_path)
            .args(self.args(url))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = tokio::time::timeout(self.socket_timeout, run)
            .await
            .map_err(|_| ResolveError::TimedOut(format!("yt-dlp не ответил за {:?}", self.socket_timeout)))?
            .map_err(|e| {
                ResolveError::Failed(format!(
                    "Не удалось запустить yt-dlp ({}): {}",
                    self.ytdlp_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("Download error: {}", stderr.trim());
            return Err(classify_failure(stderr.trim()));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ResolveError::Malformed(format!("yt-dlp вернул некорректный JSON: {}", e)))?;

        parse_resolved(&json)
    }
}

/// Sorts yt-dlp's error text into a kind. yt-dlp only reports failures as
/// text, so this is the one place that looks inside it.
pub fn classify_failure(stderr: &str) -> ResolveError {
    let lower = stderr.to_lowercase();
    let detail = if stderr.is_empty() {
        "yt-dlp завершился с ошибкой".to_string()
    } else {
        stderr.to_string()
    };

    if lower.contains("facebook") {
        ResolveError::RequiresAuth(detail)
    } else if lower.contains("timed out") {
        ResolveError::TimedOut(detail)
    } else {
        ResolveError::Failed(detail)
    }
}

pub fn parse_resolved(json: &serde_json::Value) -> Result<ResolvedMedia, ResolveError> {
    let stream_url = json
        .get("url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ResolveError::Malformed("в ответе нет ссылки на поток".to_string()))?
        .to_string();

    let title = json
        .get("title")
        .and_then(|v| v.as_str())
        .map(filename::sanitize_title)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let duration_seconds = json
        .get("duration")
        .and_then(|v| v.as_f64())
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d as u64)
        .unwrap_or(0);

    let approx_size_bytes = json
        .get("filesize")
        .and_then(|v| v.as_u64())
        .filter(|s| *s > 0)
        .or_else(|| json.get("filesize_approx").and_then(|v| v.as_f64()).map(|s| s as u64))
        .unwrap_or(0);

    let platform = json
        .get("extractor")
        .or_else(|| json.get("extractor_key"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(ResolvedMedia {
        stream_url,
        title,
        duration_seconds,
        approx_size_bytes,
        platform,
    })
}
