use std::path::Path;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTags {
    pub title: String,
    pub performer: String,
}

/// The conversation a session talks to.
///
/// `Status` identifies the single in-place status message a session keeps
/// editing while it works.
#[async_trait]
pub trait ChatSink: Send + Sync {
    type Status: Send + Sync;

    async fn post_status(&self, text: &str) -> anyhow::Result<Self::Status>;
    async fn edit_status(&self, status: &Self::Status, text: &str) -> anyhow::Result<()>;
    async fn delete_status(&self, status: &Self::Status) -> anyhow::Result<()>;
    async fn reply_text(&self, text: &str) -> anyhow::Result<()>;
    async fn send_video(&self, path: &Path, caption: &str) -> anyhow::Result<()>;
    async fn send_document(&self, path: &Path, caption: &str) -> anyhow::Result<()>;
    async fn send_audio(&self, path: &Path, caption: &str, tags: &AudioTags) -> anyhow::Result<()>;
}
