use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Name of the transcoded soundtrack inside the scratch directory
pub const TEMP_AUDIO_NAME: &str = "temp_audio.m4a";

/// Per-run working directory for frames, title text and transcoded audio
///
/// Removed by [`ScratchDir::cleanup`] or, failing that, on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    /// Create `<parent>/.video_gallery_<pid>`
    pub fn create<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let path = parent
            .as_ref()
            .join(format!(".video_gallery_{}", std::process::id()));
        std::fs::create_dir_all(&path)?;
        debug!("Scratch directory: {:?}", path);
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join<P: AsRef<Path>>(&self, name: P) -> PathBuf {
        self.path().join(name)
    }

    pub fn audio_path(&self) -> PathBuf {
        self.join(TEMP_AUDIO_NAME)
    }

    /// Best-effort removal; failures are logged, never returned
    pub fn cleanup(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        let path = &self.path;

        let audio = path.join(TEMP_AUDIO_NAME);
        if audio.exists() {
            if let Err(e) = std::fs::remove_file(&audio) {
                warn!("Failed to remove temporary audio {:?}: {}", audio, e);
            }
        }

        if path.exists() {
            if let Err(e) = std::fs::remove_dir_all(path) {
                warn!("Failed to remove temporary directory {:?}: {}", path, e);
            }
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.remove();
    }
}
