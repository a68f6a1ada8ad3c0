use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing::info;

use crate::{
    color::Color,
    config::{Config, FontWeight, SizePreset},
    error::Result,
};

/// `--title_font_file` value: a path, or `none`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile(pub Option<PathBuf>);

impl FromStr for FontFile {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            Ok(Self(None))
        } else {
            Ok(Self(Some(PathBuf::from(trimmed))))
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "video-gallery",
    version,
    about = "Turn a folder of images into a crossfaded slideshow video",
    long_about = "Reads images from images/ (sorted by file name) and an optional \
                  soundtrack from sound/, crossfades between the images, overlays \
                  optional titles and writes output/video_gallery_<size>_<timestamp>.mp4."
)]
pub struct Args {
    /// Output size preset [default: fullhd]
    #[arg(long, value_enum, ignore_case = true)]
    pub size: Option<SizePreset>,

    /// Seconds each image is fully visible [default: 3]
    #[arg(long)]
    pub duration: Option<f64>,

    /// Seconds of crossfade between images [default: 3]
    #[arg(long)]
    pub crossfade: Option<f64>,

    /// Frames per second [default: 24]
    #[arg(long)]
    pub fps: Option<u32>,

    /// Minimum gap between image and frame edge, in pixels [default: 20]
    #[arg(long)]
    pub margin: Option<u32>,

    /// Background color, by name or #rrggbb [default: black]
    #[arg(long)]
    pub background: Option<Color>,

    /// Color of the margin band around untitled images [default: black]
    #[arg(long = "margin_color")]
    pub margin_color: Option<Color>,

    /// Seconds a title stays on screen [default: 3]
    #[arg(long = "title_duration")]
    pub title_duration: Option<f64>,

    /// Title font family [default: Arial]
    #[arg(long = "title_font")]
    pub title_font: Option<String>,

    /// Title font size in pixels [default: 60]
    #[arg(long = "title_font_size")]
    pub title_font_size: Option<u32>,

    /// Title font weight [default: normal]
    #[arg(long = "title_font_weight", value_enum, ignore_case = true)]
    pub title_font_weight: Option<FontWeight>,

    /// File mapping image names to titles, one `name:title` per line [default: titles.txt]
    #[arg(long = "title_file")]
    pub title_file: Option<PathBuf>,

    /// Title text color [default: white]
    #[arg(long = "title_color")]
    pub title_color: Option<Color>,

    /// Font file for titles, or `none` to look the font up by name [default: none]
    #[arg(long = "title_font_file")]
    pub title_font_file: Option<FontFile>,

    /// Soundtrack fade-in in seconds [default: 0]
    #[arg(long = "audio_fade_in")]
    pub audio_fade_in: Option<f64>,

    /// Soundtrack fade-out in seconds [default: 3]
    #[arg(long = "audio_fade_out")]
    pub audio_fade_out: Option<f64>,

    /// TOML configuration file; command-line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Plan the video and print the timeline without rendering
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve defaults, the config file and flags into a validated [`Config`]
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(crossfade) = self.crossfade {
            config.crossfade = crossfade;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(margin_color) = self.margin_color {
            config.margin_color = margin_color;
        }
        if let Some(duration) = self.title_duration {
            config.title.duration = duration;
        }
        if let Some(font) = &self.title_font {
            config.title.style.font = font.clone();
        }
        if let Some(size) = self.title_font_size {
            config.title.style.font_size = size;
        }
        if let Some(weight) = self.title_font_weight {
            config.title.style.font_weight = weight;
        }
        if let Some(file) = &self.title_file {
            config.title.file = file.clone();
        }
        if let Some(color) = self.title_color {
            config.title.style.color = color;
        }
        if let Some(FontFile(file)) = &self.title_font_file {
            config.title.style.font_file = file.clone();
        }
        if let Some(fade_in) = self.audio_fade_in {
            config.audio.fade_in = fade_in;
        }
        if let Some(fade_out) = self.audio_fade_out {
            config.audio.fade_out = fade_out;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, GalleryError};
    use crate::layout::FrameSize;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("video-gallery").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap().resolve().unwrap();
        assert_eq!(config.size, SizePreset::FullHd);
        assert_eq!(config.duration, 3.0);
        assert_eq!(config.crossfade, 3.0);
        assert_eq!(config.fps, 24);
        assert_eq!(config.margin, 20);
        assert_eq!(config.title.style.font_file, None);
    }

    #[test]
    fn test_all_flags() {
        let flags = [
            ("--size", "instastory"),
            ("--duration", "4"),
            ("--crossfade", "1"),
            ("--fps", "30"),
            ("--margin", "40"),
            ("--background", "white"),
            ("--margin_color", "#112233"),
            ("--title_duration", "2.5"),
            ("--title_font", "Helvetica"),
            ("--title_font_size", "72"),
            ("--title_font_weight", "bold"),
            ("--title_file", "captions.txt"),
            ("--title_color", "yellow"),
            ("--title_font_file", "fonts/Title.ttf"),
            ("--audio_fade_in", "1"),
            ("--audio_fade_out", "5"),
        ];
        let argv: Vec<&str> = flags.iter().flat_map(|(flag, value)| [*flag, *value]).collect();
        let args = parse(&argv).unwrap();

        let config = args.resolve().unwrap();
        assert_eq!(config.frame_size(), FrameSize::new(1080, 1920));
        assert_eq!(config.duration, 4.0);
        assert_eq!(config.crossfade, 1.0);
        assert_eq!(config.fps, 30);
        assert_eq!(config.margin, 40);
        assert_eq!(config.background, Color::WHITE);
        assert_eq!(config.margin_color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(config.title.duration, 2.5);
        assert_eq!(config.title.style.font, "Helvetica");
        assert_eq!(config.title.style.font_size, 72);
        assert_eq!(config.title.style.font_weight, FontWeight::Bold);
        assert_eq!(config.title.file, PathBuf::from("captions.txt"));
        assert_eq!(config.title.style.color, Color::rgb(255, 255, 0));
        assert_eq!(config.title.style.font_file, Some(PathBuf::from("fonts/Title.ttf")));
        assert_eq!(config.audio.fade_in, 1.0);
        assert_eq!(config.audio.fade_out, 5.0);
    }

    #[test]
    fn test_unknown_size_is_usage_error() {
        let err = parse(&["--size", "giant"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_size_is_case_insensitive() {
        let args = parse(&["--size", "4K"]).unwrap();
        assert_eq!(args.size, Some(SizePreset::FourK));
    }

    #[test]
    fn test_bad_color_is_usage_error() {
        assert!(parse(&["--title_color", "not-a-color"]).is_err());
    }

    #[test]
    fn test_font_file_none() {
        let args = parse(&["--title_font_file", "None"]).unwrap();
        assert_eq!(args.title_font_file, Some(FontFile(None)));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let err = parse(&["--duration", "0"]).unwrap().resolve().unwrap_err();
        assert!(matches!(err, GalleryError::Config(ConfigError::InvalidValue { .. })));

        let err = parse(&["--margin", "600"]).unwrap().resolve().unwrap_err();
        assert!(matches!(err, GalleryError::Config(ConfigError::MarginTooLarge { .. })));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        std::fs::write(&path, "size = \"4k\"\nfps = 30\nmargin = 50\n").unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--fps", "60"])
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(config.size, SizePreset::FourK);
        assert_eq!(config.fps, 60);
        assert_eq!(config.margin, 50);
    }
}
