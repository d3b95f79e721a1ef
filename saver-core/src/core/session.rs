use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::chat::{AudioTags, ChatSink};
use crate::core::delivery::{self, DeliveryDecision, DeliveryMode};
use crate::core::direct_downloader::{DirectDownloader, ProgressReporter};
use crate::core::error::{SaverError, UNSUPPORTED_PLATFORM_MESSAGE};
use crate::core::filename;
use crate::core::temp_files::SessionFiles;
use crate::core::url_parser::MediaRequest;
use crate::core::ytdlp::YtDlpResolver;
use crate::models::media::{DownloadProgress, MediaKind, ResolvedMedia};
use crate::models::settings::BotSettings;
use crate::platforms::traits::MediaResolver;
use crate::platforms::Platform;

const AUDIO_TITLE_MAX_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Classifying,
    Resolving,
    DownloadingVideo,
    DeliveringVideo,
    DownloadingAudio,
    DeliveringAudio,
    Cleanup,
    Done,
    Failed,
}

impl SessionState {
    fn downloading(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => SessionState::DownloadingVideo,
            MediaKind::Audio => SessionState::DownloadingAudio,
        }
    }

    fn delivering(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => SessionState::DeliveringVideo,
            MediaKind::Audio => SessionState::DeliveringAudio,
        }
    }
}

/// Long-lived pieces every session borrows: resolver, HTTP downloader and
/// the directory temp files go into.
pub struct SaverService {
    resolver: Arc<dyn MediaResolver>,
    downloader: DirectDownloader,
    temp_dir: PathBuf,
}

impl SaverService {
    pub fn new(settings: &BotSettings) -> anyhow::Result<Self> {
        Ok(Self::with_parts(
            Arc::new(YtDlpResolver::new(settings)),
            DirectDownloader::new(settings)?,
            settings.temp_dir.clone(),
        ))
    }

    pub fn with_parts(
        resolver: Arc<dyn MediaResolver>,
        downloader: DirectDownloader,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            resolver,
            downloader,
            temp_dir,
        }
    }

    pub fn resolver_name(&self) -> &str {
        self.resolver.name()
    }

    pub fn session<'a, C: ChatSink>(&'a self, chat: &'a C) -> Session<'a, C> {
        Session {
            service: self,
            chat,
            state: SessionState::Classifying,
            history: vec![SessionState::Classifying],
        }
    }
}

/// One user link, from classification to cleanup. Steps run strictly in
/// sequence; nothing is shared with other sessions.
pub struct Session<'a, C: ChatSink> {
    service: &'a SaverService,
    chat: &'a C,
    state: SessionState,
    history: Vec<SessionState>,
}

impl<'a, C: ChatSink> Session<'a, C> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    /// Runs the whole session. The user has already been told the outcome
    /// when this returns; temp files are gone on every path.
    pub async fn run(&mut self, raw_url: &str) -> Result<Platform, SaverError> {
        let request = MediaRequest::parse(raw_url);

        let Some(platform) = request.platform else {
            tracing::info!("Unsupported link: {}", request.raw_url);
            self.enter(SessionState::Failed);
            self.reply(UNSUPPORTED_PLATFORM_MESSAGE).await;
            return Err(SaverError::UnsupportedPlatform);
        };

        let status = match self
            .chat
            .post_status(&format!("⏳ Обрабатываю ссылку {}...", platform))
            .await
        {
            Ok(status) => status,
            Err(e) => {
                let err = SaverError::DeliveryFailed(format!("{e:#}"));
                tracing::error!("Error: {}", err);
                self.enter(SessionState::Failed);
                self.reply(&err.user_message()).await;
                return Err(err);
            }
        };

        let mut files = SessionFiles::new(&self.service.temp_dir);
        let result = self.pipeline(&request, platform, &status, &mut files).await;

        let failed_in = self.state;
        self.enter(SessionState::Cleanup);
        files.cleanup();

        if let Err(e) = self.chat.delete_status(&status).await {
            tracing::warn!("Failed to delete status message: {}", e);
        }

        match result {
            Ok(()) => {
                self.enter(SessionState::Done);
                tracing::info!("Session for {} finished", platform);
                self.reply(&format!(
                    "✅ Готово! Наслаждайтесь контентом из {} в максимальном качестве!",
                    platform
                ))
                .await;
                Ok(platform)
            }
            Err(err) => {
                self.enter(SessionState::Failed);
                tracing::error!("Error during {:?}: {}", failed_in, err);
                self.reply(&err.user_message()).await;
                Err(err)
            }
        }
    }

    async fn pipeline(
        &mut self,
        request: &MediaRequest,
        platform: Platform,
        status: &C::Status,
        files: &mut SessionFiles,
    ) -> Result<(), SaverError> {
        self.enter(SessionState::Resolving);
        let media = self.service.resolver.resolve(request.resolver_url()).await?;
        tracing::info!(
            "Resolved {} via {}: \"{}\" ({}s, ~{} bytes)",
            platform,
            media.platform,
            media.title,
            media.duration_seconds,
            media.approx_size_bytes
        );

        self.announce(status, &delivery::pre_download_status(media.approx_size_bytes))
            .await;

        for kind in [MediaKind::Video, MediaKind::Audio] {
            self.enter(SessionState::downloading(kind));
            if kind == MediaKind::Audio {
                self.announce(status, "🎵 Подготавливаю аудио...").await;
            }

            let path = files
                .create(kind)
                .map_err(|e| {
                    SaverError::DownloadNetworkError(format!("Не удалось создать временный файл: {}", e))
                })?;

            let reporter = StatusProgress {
                chat: self.chat,
                status,
                label: kind.progress_label(),
            };
            let written = self
                .service
                .downloader
                .download(&media.stream_url, &path, &reporter)
                .await?;

            self.enter(SessionState::delivering(kind));
            let actual_size = tokio::fs::metadata(&path)
                .await
                .map(|m| m.len())
                .unwrap_or(written);
            let decision = DeliveryDecision::decide(actual_size);
            tracing::debug!("{:?} {} bytes → {:?}", kind, actual_size, decision.mode);

            self.announce(status, decision.status_text(kind)).await;
            self.deliver(kind, &decision, &path, &media, platform).await?;
        }

        Ok(())
    }

    async fn deliver(
        &self,
        kind: MediaKind,
        decision: &DeliveryDecision,
        path: &Path,
        media: &ResolvedMedia,
        platform: Platform,
    ) -> Result<(), SaverError> {
        let caption = decision.caption(kind, media, platform);

        let sent = match (decision.mode, kind) {
            (DeliveryMode::Document, _) => self.chat.send_document(path, &caption).await,
            (DeliveryMode::RichMedia, MediaKind::Video) => {
                self.chat.send_video(path, &caption).await
            }
            (DeliveryMode::RichMedia, MediaKind::Audio) => {
                let tags = AudioTags {
                    title: filename::truncate_chars(&media.title, AUDIO_TITLE_MAX_CHARS)
                        .to_string(),
                    performer: platform.to_string(),
                };
                self.chat.send_audio(path, &caption, &tags).await
            }
        };

        sent.map_err(|e| SaverError::DeliveryFailed(format!("{e:#}")))
    }

    async fn announce(&self, status: &C::Status, text: &str) {
        if let Err(e) = self.chat.edit_status(status, text).await {
            tracing::warn!("Failed to update status: {}", e);
        }
    }

    async fn reply(&self, text: &str) {
        if let Err(e) = self.chat.reply_text(text).await {
            tracing::warn!("Failed to send reply: {}", e);
        }
    }

    fn enter(&mut self, next: SessionState) {
        tracing::debug!("session {:?} → {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}

struct StatusProgress<'a, C: ChatSink> {
    chat: &'a C,
    status: &'a C::Status,
    label: &'static str,
}

#[async_trait]
impl<C: ChatSink> ProgressReporter for StatusProgress<'_, C> {
    async fn report(&self, progress: &DownloadProgress) -> anyhow::Result<()> {
        self.chat
            .edit_status(self.status, &progress.render(self.label))
            .await
    }
}
