use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    error::{ConfigError, Result},
    layout::FrameSize,
};

/// Output frame size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SizePreset {
    /// 1920x1080
    #[serde(rename = "fullhd")]
    #[value(name = "fullhd")]
    FullHd,

    /// 3840x2160
    #[serde(rename = "4k")]
    #[value(name = "4k")]
    FourK,

    /// 1080x1920, portrait
    #[serde(rename = "instastory")]
    #[value(name = "instastory")]
    Instastory,
}

impl SizePreset {
    pub fn frame_size(self) -> FrameSize {
        match self {
            Self::FullHd => FrameSize::new(1920, 1080),
            Self::FourK => FrameSize::new(3840, 2160),
            Self::Instastory => FrameSize::new(1080, 1920),
        }
    }

    /// Label embedded in the output file name
    pub fn label(self) -> &'static str {
        match self {
            Self::FullHd => "fullhd",
            Self::FourK => "4k",
            Self::Instastory => "instastory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

/// How title overlays are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleStyle {
    /// Font family, resolved through fontconfig when no font file is given
    pub font: String,
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub color: Color,
    pub font_file: Option<PathBuf>,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 60,
            font_weight: FontWeight::Normal,
            color: Color::WHITE,
            font_file: None,
        }
    }
}

/// Title overlay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// How long a title stays on screen (seconds)
    pub duration: f64,

    /// `<image-filename>:<title>` mapping file
    pub file: PathBuf,

    pub style: TitleStyle,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            duration: 3.0,
            file: PathBuf::from("titles.txt"),
            style: TitleStyle::default(),
        }
    }
}

/// Soundtrack envelope settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Fade-in at the start of the soundtrack (seconds)
    pub fade_in: f64,

    /// Fade-out at the end of the soundtrack (seconds)
    pub fade_out: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fade_in: 0.0,
            fade_out: 3.0,
        }
    }
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub images_dir: PathBuf,
    pub sound_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Parent of the per-run scratch directory
    pub scratch_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            sound_dir: PathBuf::from("sound"),
            output_dir: PathBuf::from("output"),
            scratch_dir: PathBuf::from("."),
        }
    }
}

/// Encoder tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Quality setting (0-100, higher is better)
    pub quality: u8,

    /// AAC bitrate passed to ffmpeg, e.g. "192k"
    pub audio_bitrate: String,

    /// Number of frame rendering threads
    pub threads: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            audio_bitrate: "192k".to_string(),
            threads: num_cpus::get(),
        }
    }
}

impl EncoderConfig {
    /// Map the 0-100 quality scale onto x264's CRF range
    pub fn crf(&self) -> u8 {
        (51 - ((self.quality.min(100) as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }
}

/// Main configuration for a gallery run
///
/// Built once at startup and passed by reference to every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub size: SizePreset,

    /// Time each image is fully visible (seconds)
    pub duration: f64,

    /// Length of the crossfade between consecutive images (seconds)
    pub crossfade: f64,

    pub fps: u32,

    /// Minimum distance between an image and the frame edge (pixels)
    pub margin: u32,

    pub background: Color,
    pub margin_color: Color,
    pub title: TitleConfig,
    pub audio: AudioConfig,
    pub paths: PathsConfig,
    pub encoder: EncoderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: SizePreset::FullHd,
            duration: 3.0,
            crossfade: 3.0,
            fps: 24,
            margin: 20,
            background: Color::BLACK,
            margin_color: Color::BLACK,
            title: TitleConfig::default(),
            audio: AudioConfig::default(),
            paths: PathsConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn frame_size(&self) -> FrameSize {
        self.size.frame_size()
    }

    /// Length of the finished video for `image_count` images
    pub fn total_duration(&self, image_count: usize) -> f64 {
        if image_count == 0 {
            return 0.0;
        }
        self.duration * image_count as f64 + self.crossfade * (image_count - 1) as f64
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        require_positive("duration", self.duration)?;
        require_non_negative("crossfade", self.crossfade)?;
        require_positive("title.duration", self.title.duration)?;
        require_non_negative("audio.fade_in", self.audio.fade_in)?;
        require_non_negative("audio.fade_out", self.audio.fade_out)?;

        if self.fps == 0 {
            return Err(invalid("fps", self.fps));
        }

        if self.title.style.font_size == 0 {
            return Err(invalid("title.font_size", self.title.style.font_size));
        }

        if self.encoder.threads == 0 {
            return Err(invalid("encoder.threads", self.encoder.threads));
        }

        let frame = self.frame_size();
        if self.margin.saturating_mul(2) >= frame.width.min(frame.height) {
            return Err(ConfigError::MarginTooLarge {
                margin: self.margin,
                width: frame.width,
                height: frame.height,
            }
            .into());
        }

        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> crate::error::GalleryError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

fn require_positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, value))
    }
}

fn require_non_negative(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(key, value))
    }
}
