use thiserror::Error;

/// Main error type for the video gallery library
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    #[error("Margin {margin}px leaves no room inside a {width}x{height} frame")]
    MarginTooLarge {
        margin: u32,
        width: u32,
        height: u32,
    },
}

/// Errors raised while discovering input files
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("No images found in {path}")]
    NoImages { path: String },

    #[error("Input directory is not readable: {path}")]
    DirectoryUnreadable { path: String },

    #[error("Could not read image {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Errors raised while fitting images into the frame
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Image {path} has zero size")]
    EmptyImage { path: String },
}

/// Audio-specific errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio file: {path}")]
    LoadFailed { path: String },

    #[error("Could not determine duration of {path}")]
    UnknownDuration { path: String },

    #[error("Audio transcode failed: {reason}")]
    TranscodeFailed { reason: String },
}

/// Frame rendering and encoding errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("FFmpeg not found. Please install FFmpeg and make sure it is on PATH.")]
    FfmpegMissing,

    #[error("Failed to write frame {path}: {reason}")]
    FrameWriteFailed { path: String, reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Failed to build render thread pool: {reason}")]
    ThreadPool { reason: String },
}

/// Convenience type alias for Results using GalleryError
pub type Result<T> = std::result::Result<T, GalleryError>;

impl GalleryError {
    /// True when the run stopped because there was nothing to render
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::Asset(AssetError::NoImages { .. }))
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Asset(AssetError::NoImages { .. }) => 3,
            _ => 1,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Asset(AssetError::NoImages { path }) => {
                format!(
                    "No images found in '{}'. Add .jpg, .jpeg, .png or .gif files and try again.",
                    path
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_taxonomy() {
        let no_images: GalleryError = AssetError::NoImages { path: "images".into() }.into();
        assert!(no_images.is_empty_input());
        assert_eq!(no_images.exit_code(), 3);

        let bad_color: GalleryError = ConfigError::InvalidColor { value: "mauve".into() }.into();
        assert!(!bad_color.is_empty_input());
        assert_eq!(bad_color.exit_code(), 2);

        let encode: GalleryError = RenderError::EncodingFailed { reason: "boom".into() }.into();
        assert_eq!(encode.exit_code(), 1);
    }

    #[test]
    fn test_user_message_mentions_directory() {
        let err: GalleryError = AssetError::NoImages { path: "photos".into() }.into();
        assert!(err.user_message().contains("photos"));
    }
}
