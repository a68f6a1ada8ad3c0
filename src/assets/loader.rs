use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assets::types::ImageAsset;
use crate::error::{AssetError, Result};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

/// Discovers gallery inputs on disk
pub struct AssetLoader;

impl AssetLoader {
    /// Create the input and output directories if they are missing
    pub fn ensure_directories<P: AsRef<Path>>(dirs: &[P]) -> Result<()> {
        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.exists() {
                info!("Creating directory {:?}", dir);
            }
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Image files in `dir`, sorted by file name
    ///
    /// Returns [`AssetError::NoImages`] when nothing matches.
    pub fn list_images<P: AsRef<Path>>(dir: P) -> Result<Vec<ImageAsset>> {
        let dir = dir.as_ref();
        let mut paths = Self::files_with_extensions(dir, IMAGE_EXTENSIONS)?;

        if paths.is_empty() {
            return Err(AssetError::NoImages {
                path: dir.display().to_string(),
            }
            .into());
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let images = paths
            .iter()
            .map(ImageAsset::from_path)
            .collect::<Result<Vec<_>>>()?;

        info!("Found {} images in {:?}", images.len(), dir);
        for image in &images {
            debug!("   {} ({}x{})", image.file_name, image.width, image.height);
        }

        Ok(images)
    }

    /// Soundtrack candidates in `dir`, in directory order
    ///
    /// A missing or empty directory yields an empty list.
    pub fn list_audio<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        Self::files_with_extensions(dir, AUDIO_EXTENSIONS)
    }

    /// The soundtrack to use: the first candidate, if any
    pub fn find_soundtrack<P: AsRef<Path>>(dir: P) -> Result<Option<PathBuf>> {
        let mut candidates = Self::list_audio(dir)?.into_iter();
        let first = candidates.next();

        let ignored = candidates.count();
        if ignored > 0 {
            warn!("{} extra audio file(s) ignored, using {:?}", ignored, first);
        }

        Ok(first)
    }

    fn files_with_extensions(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|_| AssetError::DirectoryUnreadable {
            path: dir.display().to_string(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let wanted = path.is_file()
                && !Self::is_hidden_file(&path)
                && Self::has_extension(&path, extensions);
            if wanted {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn has_extension(path: &Path, extensions: &[&str]) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    fn is_hidden_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
        let format = match name.rsplit('.').next().map(|e| e.to_lowercase()).as_deref() {
            Some("png") => image::ImageFormat::Png,
            _ => image::ImageFormat::Jpeg,
        };
        RgbImage::from_pixel(width, height, Rgb([200, 100, 50]))
            .save_with_format(dir.join(name), format)
            .unwrap();
    }

    #[test]
    fn test_images_sorted_by_filename() {
        let dir = tempdir().unwrap();
        for name in ["d.jpg", "b.png", "a.jpg", "c.jpeg"] {
            write_image(dir.path(), name, 8, 6);
        }
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::write(dir.path().join("song.mp3"), "ignore me too").unwrap();

        let images = AssetLoader::list_images(dir.path()).unwrap();
        let names: Vec<_> = images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.jpeg", "d.jpg"]);
        assert_eq!((images[0].width, images[0].height), (8, 6));
    }

    #[test]
    fn test_ordering_is_lexicographic_not_numeric() {
        let dir = tempdir().unwrap();
        for name in ["10.png", "2.png", "1.png"] {
            write_image(dir.path(), name, 4, 4);
        }

        let images = AssetLoader::list_images(dir.path()).unwrap();
        let names: Vec<_> = images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.png", "10.png", "2.png"]);
    }

    #[test]
    fn test_extension_match_ignores_case_and_hidden_files() {
        let dir = tempdir().unwrap();
        write_image(dir.path(), "Photo.JPG", 4, 4);
        write_image(dir.path(), ".hidden.png", 4, 4);
        std::fs::create_dir(dir.path().join("folder.png")).unwrap();

        let images = AssetLoader::list_images(dir.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_name, "Photo.JPG");
    }

    #[test]
    fn test_empty_directory_reports_no_images() {
        let dir = tempdir().unwrap();
        let result = AssetLoader::list_images(dir.path());
        assert!(matches!(
            result,
            Err(crate::error::GalleryError::Asset(AssetError::NoImages { .. }))
        ));
    }

    #[test]
    fn test_audio_discovery() {
        let dir = tempdir().unwrap();
        assert!(AssetLoader::find_soundtrack(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join("track.wav"), b"x").unwrap();
        assert!(AssetLoader::find_soundtrack(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("two.mp3"), b"x").unwrap();
        assert_eq!(AssetLoader::list_audio(dir.path()).unwrap().len(), 2);

        let chosen = AssetLoader::find_soundtrack(dir.path()).unwrap().unwrap();
        assert_eq!(chosen.extension().unwrap(), "mp3");
    }

    #[test]
    fn test_missing_sound_directory_is_silent() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("sound");
        assert!(AssetLoader::list_audio(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let dir = tempdir().unwrap();
        let targets = [dir.path().join("images"), dir.path().join("out/nested")];

        AssetLoader::ensure_directories(&targets).unwrap();
        AssetLoader::ensure_directories(&targets).unwrap();
        assert!(targets.iter().all(|p| p.is_dir()));
    }
}
