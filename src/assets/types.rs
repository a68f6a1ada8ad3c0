use std::path::{Path, PathBuf};

use crate::error::{AssetError, Result};

/// A still image discovered in the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Path to the image file
    pub path: PathBuf,

    /// File name, used for ordering and as the title lookup key
    pub file_name: String,

    /// Natural width in pixels
    pub width: u32,

    /// Natural height in pixels
    pub height: u32,
}

impl ImageAsset {
    /// Read the image header to learn its natural size
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (width, height) = image::image_dimensions(path).map_err(|e| AssetError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            width,
            height,
        })
    }
}
