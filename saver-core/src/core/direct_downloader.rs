use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;

use crate::core::error::DownloadError;
use crate::models::media::DownloadProgress;
use crate::models::settings::BotSettings;

pub const CHUNK_SIZE: usize = 32 * 1024;

// Some CDNs refuse default client identifiers.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, progress: &DownloadProgress) -> anyhow::Result<()>;
}

/// Lets an update through at most once per `interval`, measured from the
/// previous update (or from the start for the first one).
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    last_emit: Instant,
    emitted: bool,
}

impl ProgressThrottle {
    pub fn new(interval: Duration, started: Instant) -> Self {
        Self {
            interval,
            last_emit: started,
            emitted: false,
        }
    }

    pub fn should_emit(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_emit) >= self.interval {
            self.last_emit = now;
            self.emitted = true;
            true
        } else {
            false
        }
    }

    pub fn has_emitted(&self) -> bool {
        self.emitted
    }
}

pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::REFERER,
        HeaderValue::from_static("https://www.facebook.com/"),
    );
    headers
}

pub struct DirectDownloader {
    client: reqwest::Client,
    read_timeout: Duration,
    progress_interval: Duration,
}

impl DirectDownloader {
    pub fn new(settings: &BotSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .connect_timeout(settings.request_timeout())
            .read_timeout(settings.request_timeout())
            .timeout(settings.download_timeout())
            .build()?;

        Ok(Self::with_client(
            client,
            settings.request_timeout(),
            settings.progress_interval(),
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        read_timeout: Duration,
        progress_interval: Duration,
    ) -> Self {
        Self {
            client,
            read_timeout,
            progress_interval,
        }
    }

    /// Streams `url` into `output`, returning the number of bytes written.
    ///
    /// On error the partially written file is left for the caller to remove.
    pub async fn download(
        &self,
        url: &str,
        output: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<u64, DownloadError> {
        let started = Instant::now();
        let mut throttle = ProgressThrottle::new(self.progress_interval, started);

        let response = tokio::time::timeout(self.read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| DownloadError::Timeout)?
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Network(format!("HTTP {} для {}", status, url)));
        }

        let total_bytes = response.content_length().filter(|len| *len > 0);
        tracing::debug!("[direct] {} → {:?} bytes expected", url, total_bytes);

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let mut reader = StreamReader::new(Box::pin(stream));
        let mut file = tokio::fs::File::create(output).await?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            let read = tokio::time::timeout(self.read_timeout, reader.read(&mut buf))
                .await
                .map_err(|_| DownloadError::Timeout)?
                .map_err(map_stream_error)?;

            if read == 0 {
                break;
            }

            file.write_all(&buf[..read]).await?;
            downloaded += read as u64;

            let now = Instant::now();
            if throttle.should_emit(now) {
                emit(reporter, downloaded, total_bytes, now - started).await;
            }
        }

        file.flush().await?;

        if let Some(expected) = total_bytes {
            if downloaded < expected {
                return Err(DownloadError::Network(format!(
                    "Неполная загрузка: получено {} из {} байт",
                    downloaded, expected
                )));
            }
        }

        // A long transfer whose chunks all landed inside one window still
        // gets one update.
        let elapsed = started.elapsed();
        if !throttle.has_emitted() && elapsed >= self.progress_interval {
            emit(reporter, downloaded, total_bytes, elapsed).await;
        }

        Ok(downloaded)
    }
}

async fn emit(
    reporter: &dyn ProgressReporter,
    bytes_downloaded: u64,
    total_bytes: Option<u64>,
    elapsed: Duration,
) {
    let progress = DownloadProgress {
        bytes_downloaded,
        total_bytes,
        elapsed,
    };
    if let Err(e) = reporter.report(&progress).await {
        tracing::warn!("Failed to update progress: {}", e);
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DownloadError {
    if err.is_timeout() {
        DownloadError::Timeout
    } else {
        DownloadError::Network(err.to_string())
    }
}

fn map_stream_error(err: std::io::Error) -> DownloadError {
    if let Some(inner) = err
        .get_ref()
        .and_then(|e| e.downcast_ref::<reqwest::Error>())
    {
        if inner.is_timeout() {
            return DownloadError::Timeout;
        }
        return DownloadError::Network(inner.to_string());
    }
    if err.kind() == std::io::ErrorKind::TimedOut {
        return DownloadError::Timeout;
    }
    DownloadError::Network(err.to_string())
}
