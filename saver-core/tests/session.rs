use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use saver_core::core::chat::{AudioTags, ChatSink};
use saver_core::core::direct_downloader::DirectDownloader;
use saver_core::core::error::{ResolveError, SaverError, UNSUPPORTED_PLATFORM_MESSAGE};
use saver_core::core::session::{SaverService, SessionState};
use saver_core::models::media::ResolvedMedia;
use saver_core::platforms::traits::MediaResolver;
use saver_core::platforms::Platform;

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Video { path: PathBuf, bytes: u64, caption: String },
    Document { path: PathBuf, bytes: u64, caption: String },
    Audio { path: PathBuf, bytes: u64, tags: AudioTags },
}

#[derive(Default)]
struct RecordingChat {
    statuses: Mutex<Vec<String>>,
    edits: Mutex<Vec<String>>,
    deleted: AtomicUsize,
    replies: Mutex<Vec<String>>,
    sent: Mutex<Vec<Sent>>,
    reject_uploads: bool,
}

impl RecordingChat {
    fn rejecting_uploads() -> Self {
        Self {
            reject_uploads: true,
            ..Self::default()
        }
    }

    fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, sent: Sent) -> anyhow::Result<()> {
        if self.reject_uploads {
            anyhow::bail!("Request Entity Too Large");
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

fn size_of(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[async_trait]
impl ChatSink for RecordingChat {
    type Status = usize;

    async fn post_status(&self, text: &str) -> anyhow::Result<usize> {
        let mut statuses = self.statuses.lock().unwrap();
        statuses.push(text.to_string());
        Ok(statuses.len())
    }

    async fn edit_status(&self, _status: &usize, text: &str) -> anyhow::Result<()> {
        self.edits.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn delete_status(&self, _status: &usize) -> anyhow::Result<()> {
        self.deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reply_text(&self, text: &str) -> anyhow::Result<()> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_video(&self, path: &Path, caption: &str) -> anyhow::Result<()> {
        self.record(Sent::Video {
            path: path.to_path_buf(),
            bytes: size_of(path),
            caption: caption.to_string(),
        })
    }

    async fn send_document(&self, path: &Path, caption: &str) -> anyhow::Result<()> {
        self.record(Sent::Document {
            path: path.to_path_buf(),
            bytes: size_of(path),
            caption: caption.to_string(),
        })
    }

    async fn send_audio(&self, path: &Path, _caption: &str, tags: &AudioTags) -> anyhow::Result<()> {
        self.record(Sent::Audio {
            path: path.to_path_buf(),
            bytes: size_of(path),
            tags: tags.clone(),
        })
    }
}

struct ScriptedResolver {
    answer: Result<ResolvedMedia, ResolveError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedResolver {
    fn new(answer: Result<ResolvedMedia, ResolveError>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaResolver for ScriptedResolver {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn resolve(&self, url: &str) -> Result<ResolvedMedia, ResolveError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.answer.clone()
    }
}

fn service(resolver: Arc<ScriptedResolver>, temp_dir: &Path) -> SaverService {
    let downloader = DirectDownloader::with_client(
        reqwest::Client::new(),
        Duration::from_secs(5),
        Duration::from_secs(10),
    );
    SaverService::with_parts(resolver, downloader, temp_dir.to_path_buf())
}

fn media(stream_url: String) -> ResolvedMedia {
    ResolvedMedia {
        stream_url,
        title: "demo".to_string(),
        duration_seconds: 12,
        approx_size_bytes: 1_000_000,
        platform: "tiktok".to_string(),
    }
}

fn leftover_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn tiktok_link_is_delivered_as_video_and_audio() {
    let body = vec![42u8; 1_000_000];
    let mut server = mockito::Server::new_async().await;
    let origin = server
        .mock("GET", "/x.mp4")
        .with_status(200)
        .with_body(body)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Ok(media(format!("{}/x.mp4", server.url()))));
    let service = service(resolver.clone(), dir.path());
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session
        .run("https://www.tiktok.com/@user/video/123?lang=en")
        .await;

    assert_eq!(outcome.unwrap(), Platform::TikTok);
    origin.assert_async().await;
    assert_eq!(resolver.calls(), ["https://www.tiktok.com/@user/video/123"]);

    let sent = chat.sent();
    assert_eq!(sent.len(), 2);
    match &sent[0] {
        Sent::Video { path, bytes, caption } => {
            assert_eq!(*bytes, 1_000_000);
            assert!(caption.starts_with("🎬 demo\n📺 Из: TikTok"));
            assert!(!path.exists());
        }
        other => panic!("expected video first, got {other:?}"),
    }
    match &sent[1] {
        Sent::Audio { path, bytes, tags } => {
            assert_eq!(*bytes, 1_000_000);
            assert_eq!(tags.performer, "TikTok");
            assert_eq!(tags.title, "demo");
            assert!(!path.exists());
        }
        other => panic!("expected audio second, got {other:?}"),
    }

    assert_eq!(leftover_files(dir.path()), 0);
    assert_eq!(
        chat.statuses.lock().unwrap().as_slice(),
        ["⏳ Обрабатываю ссылку TikTok..."]
    );
    let edits = chat.edits.lock().unwrap().clone();
    assert_eq!(edits.first().map(String::as_str), Some("📥 Загружаю в максимальном качестве..."));
    assert!(edits.iter().any(|e| e == "🎵 Подготавливаю аудио..."));
    assert_eq!(edits.last().map(String::as_str), Some("📤 Отправляю аудио..."));
    assert_eq!(chat.deleted.load(Ordering::SeqCst), 1);
    let replies = chat.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with("✅ Готово!"));
    assert!(replies[0].contains("TikTok"));

    assert_eq!(
        session.history(),
        [
            SessionState::Classifying,
            SessionState::Resolving,
            SessionState::DownloadingVideo,
            SessionState::DeliveringVideo,
            SessionState::DownloadingAudio,
            SessionState::DeliveringAudio,
            SessionState::Cleanup,
            SessionState::Done,
        ]
    );
}

#[tokio::test]
async fn unsupported_link_never_reaches_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Err(ResolveError::Failed("unused".into())));
    let service = service(resolver.clone(), dir.path());
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session.run("https://vimeo.com/12345").await;

    assert!(matches!(outcome, Err(SaverError::UnsupportedPlatform)));
    assert!(resolver.calls().is_empty());
    assert!(chat.statuses.lock().unwrap().is_empty());
    assert_eq!(chat.replies(), [UNSUPPORTED_PLATFORM_MESSAGE]);
    assert_eq!(session.state(), SessionState::Failed);
}

#[tokio::test]
async fn facebook_login_wall_gets_curated_message() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Err(ResolveError::RequiresAuth(
        "ERROR: [facebook] 1029: You must log in to continue".into(),
    )));
    let service = service(resolver, dir.path());
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session
        .run("https://www.facebook.com/user/videos/1029/")
        .await;

    assert!(matches!(outcome, Err(SaverError::ResolutionRequiresAuth(_))));
    let replies = chat.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Проблема доступа к видео Facebook"));
    assert!(!replies[0].contains("❌ Ошибка:"));
    assert_eq!(chat.deleted.load(Ordering::SeqCst), 1);
    assert!(chat.sent().is_empty());
    assert_eq!(leftover_files(dir.path()), 0);
}

#[tokio::test]
async fn failed_download_leaves_no_temp_files() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing.mp4")
        .with_status(404)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Ok(media(format!("{}/missing.mp4", server.url()))));
    let service = service(resolver, dir.path());
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session.run("https://youtu.be/abc?t=5").await;

    assert!(matches!(outcome, Err(SaverError::DownloadNetworkError(_))));
    assert_eq!(leftover_files(dir.path()), 0);
    assert!(chat.replies()[0].starts_with("❌ Ошибка:"));
    assert!(session.history().contains(&SessionState::DownloadingVideo));
    assert!(!session.history().contains(&SessionState::DeliveringVideo));
    assert_eq!(
        &session.history()[session.history().len() - 2..],
        [SessionState::Cleanup, SessionState::Failed]
    );
}

#[tokio::test]
async fn rejected_upload_stops_before_audio() {
    let mut server = mockito::Server::new_async().await;
    let origin = server
        .mock("GET", "/x.mp4")
        .with_status(200)
        .with_body(vec![1u8; 4096])
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Ok(media(format!("{}/x.mp4", server.url()))));
    let service = service(resolver, dir.path());
    let chat = RecordingChat::rejecting_uploads();

    let mut session = service.session(&chat);
    let outcome = session
        .run("https://www.instagram.com/reel/Cabc/")
        .await;

    assert!(matches!(outcome, Err(SaverError::DeliveryFailed(_))));
    origin.assert_async().await;
    assert_eq!(leftover_files(dir.path()), 0);
    let replies = chat.replies();
    assert!(replies[0].ends_with("⚠️ Файл слишком большой для Telegram."));
    assert!(!session.history().contains(&SessionState::DownloadingAudio));
}

#[tokio::test]
async fn large_file_is_sent_as_document() {
    let body = vec![0u8; 45 * 1024 * 1024 + 1];
    let mut server = mockito::Server::new_async().await;
    let origin = server
        .mock("GET", "/big.mp4")
        .with_status(200)
        .with_body(body)
        .expect(2)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Ok(media(format!("{}/big.mp4", server.url()))));
    let service = service(resolver, dir.path());
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session.run("https://www.youtube.com/shorts/abc").await;

    assert_eq!(outcome.unwrap(), Platform::YouTube);
    origin.assert_async().await;

    let sent = chat.sent();
    assert_eq!(sent.len(), 2);
    let captions: Vec<&str> = sent
        .iter()
        .map(|s| match s {
            Sent::Document { bytes, caption, .. } => {
                assert_eq!(*bytes, 45 * 1024 * 1024 + 1);
                caption.as_str()
            }
            other => panic!("expected document, got {other:?}"),
        })
        .collect();
    assert!(captions[0].starts_with("🎬 demo\n📺 Из: YouTube"));
    assert!(captions[0].contains("💾 Размер: 45МБ"));
    assert!(captions[0].ends_with("отправлен как документ."));
    assert!(captions[1].starts_with("🎵 Аудио из YouTube"));
    assert!(captions[1].ends_with("отправлен как документ."));

    let edits = chat.edits.lock().unwrap().clone();
    assert!(edits.iter().any(|e| e == "📤 Файл большой, отправляю как документ..."));
    assert_eq!(leftover_files(dir.path()), 0);
}

#[tokio::test]
async fn audio_failure_cleans_both_files() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/x.mp4")
        .with_status(200)
        .with_body(vec![3u8; 8192])
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/x.mp4")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver = ScriptedResolver::new(Ok(media(format!("{}/x.mp4", server.url()))));
    let service = service(resolver, dir.path());
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session.run("https://www.tiktok.com/@user/video/9").await;

    assert!(matches!(outcome, Err(SaverError::DownloadNetworkError(_))));
    first.assert_async().await;
    second.assert_async().await;

    let sent = chat.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Video { path, .. } => assert!(!path.exists()),
        other => panic!("expected video, got {other:?}"),
    }
    assert_eq!(leftover_files(dir.path()), 0);
    assert!(session.history().contains(&SessionState::DownloadingAudio));
    assert!(!session.history().contains(&SessionState::DeliveringAudio));
    assert!(chat.replies()[0].starts_with("❌ Ошибка: Ошибка загрузки:"));
}

#[tokio::test]
async fn missing_temp_dir_reports_generic_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/x.mp4")
        .with_status(200)
        .with_body(vec![1u8; 16])
        .create_async()
        .await;

    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("gone");
    let resolver = ScriptedResolver::new(Ok(media(format!("{}/x.mp4", server.url()))));
    let service = service(resolver, &missing);
    let chat = RecordingChat::default();

    let mut session = service.session(&chat);
    let outcome = session.run("https://www.instagram.com/p/Cxyz/").await;

    assert!(matches!(outcome, Err(SaverError::DownloadNetworkError(_))));
    let replies = chat.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with("❌ Ошибка: Ошибка загрузки: Не удалось создать временный файл"));
    assert!(!replies[0].contains("Ошибка обработки видео"));
    assert!(chat.sent().is_empty());
}
