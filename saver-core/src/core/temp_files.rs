use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::models::media::MediaKind;

/// The temporary files one session owns: at most one per media kind.
///
/// Files are removed by [`SessionFiles::cleanup`], and again on drop should a
/// session future be torn down early.
pub struct SessionFiles {
    dir: PathBuf,
    video: Option<TempPath>,
    audio: Option<TempPath>,
}

impl SessionFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            video: None,
            audio: None,
        }
    }

    /// Creates the (empty) file for `kind` and returns its path.
    pub fn create(&mut self, kind: MediaKind) -> std::io::Result<PathBuf> {
        let temp = tempfile::Builder::new()
            .prefix("anylink-")
            .suffix(kind.file_suffix())
            .tempfile_in(&self.dir)?
            .into_temp_path();
        let path = temp.to_path_buf();

        if let Some(previous) = self.slot(kind).replace(temp) {
            remove(previous);
        }

        Ok(path)
    }

    pub fn path(&self, kind: MediaKind) -> Option<&Path> {
        match kind {
            MediaKind::Video => self.video.as_deref(),
            MediaKind::Audio => self.audio.as_deref(),
        }
    }

    pub fn cleanup(&mut self) {
        for temp in [self.video.take(), self.audio.take()].into_iter().flatten() {
            remove(temp);
        }
    }

    fn slot(&mut self, kind: MediaKind) -> &mut Option<TempPath> {
        match kind {
            MediaKind::Video => &mut self.video,
            MediaKind::Audio => &mut self.audio,
        }
    }
}

impl Drop for SessionFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove(temp: TempPath) {
    let shown = temp.display().to_string();
    if let Err(e) = temp.close() {
        tracing::warn!("Failed to remove temp file {}: {}", shown, e);
    }
}
