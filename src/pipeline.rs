use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, info};

use crate::{
    assets::{AssetLoader, TitleMap},
    audio::AudioMixer,
    config::Config,
    error::Result,
    ffmpeg::Ffmpeg,
    layout,
    render::{EncodedVideo, Exporter, FrameCompositor},
    scratch::ScratchDir,
    timeline::{Segment, Sequencer, Timeline, TitleCue},
};

/// Everything decided before any media work starts
#[derive(Debug, Clone)]
pub struct GalleryPlan {
    pub timeline: Timeline,
    pub title_cues: Vec<TitleCue>,
    pub soundtrack: Option<PathBuf>,
}

impl GalleryPlan {
    pub fn total_duration(&self) -> f64 {
        self.timeline.total_duration()
    }
}

/// Drives a gallery run from input discovery to the encoded file
///
/// The pipeline follows a fixed order:
/// 1. Discovery - Find images, the soundtrack and titles
/// 2. Layout - Fit each image into the frame
/// 3. Sequencing - Pair neighbours with crossfades
/// 4. Audio - Transcode and fit the soundtrack
/// 5. Rendering - Composite frames and encode
pub struct GalleryPipeline {
    config: Config,
    ffmpeg: Ffmpeg,
}

impl GalleryPipeline {
    pub fn new(config: Config) -> Self {
        Self::with_ffmpeg(config, Ffmpeg::default())
    }

    pub fn with_ffmpeg(config: Config, ffmpeg: Ffmpeg) -> Self {
        Self { config, ffmpeg }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==========================================
    // STEPS 1-3: PLANNING
    // ==========================================

    /// Discover inputs and build the timeline without touching ffmpeg
    pub fn plan(&self) -> Result<GalleryPlan> {
        let paths = &self.config.paths;
        info!("📂 Step 1: Discovering inputs...");
        AssetLoader::ensure_directories(&[&paths.images_dir, &paths.sound_dir, &paths.output_dir])?;

        let images = AssetLoader::list_images(&paths.images_dir)?;
        let soundtrack = AssetLoader::find_soundtrack(&paths.sound_dir)?;
        let titles = TitleMap::load(&self.config.title.file)?;

        match &soundtrack {
            Some(path) => info!("   Soundtrack: {:?}", path),
            None => info!("   No soundtrack, video will be silent"),
        }

        info!("📐 Step 2: Laying out {} images...", images.len());
        let clips = layout::place_all(&images, &titles, &self.config)?;

        info!("⏱️  Step 3: Sequencing...");
        let timeline = Sequencer::new(self.config.crossfade).build(clips);
        let title_cues = timeline.title_cues(self.config.title.duration);

        Ok(GalleryPlan {
            timeline,
            title_cues,
            soundtrack,
        })
    }

    // ==========================================
    // STEPS 4-5: MEDIA WORK
    // ==========================================

    /// Plan, render and encode; returns the written file
    pub fn run(&self) -> Result<EncodedVideo> {
        let plan = self.plan()?;
        self.ffmpeg.require()?;
        self.render(&plan)
    }

    /// Render an existing plan
    pub fn render(&self, plan: &GalleryPlan) -> Result<EncodedVideo> {
        let started = Local::now();
        let total = plan.total_duration();
        let scratch = ScratchDir::create(&self.config.paths.scratch_dir)?;

        let audio = match &plan.soundtrack {
            Some(source) => {
                info!("🎵 Step 4: Preparing soundtrack...");
                Some(self.mixer().prepare(source, &scratch, total)?)
            }
            None => None,
        };

        info!("🎨 Step 5: Rendering {:.2}s of video...", total);
        let frames = FrameCompositor::new(&self.config)?.render(&plan.timeline, &scratch)?;

        let exporter = Exporter::new(&self.config, &self.ffmpeg);
        let output_path = exporter.output_path(started);
        let encoded = exporter.export(
            &frames,
            audio.as_ref(),
            &plan.title_cues,
            total,
            &scratch,
            &output_path,
        )?;

        scratch.cleanup();

        info!("🎉 Gallery complete! Output saved to: {:?}", encoded.path);
        Ok(encoded)
    }

    fn mixer(&self) -> AudioMixer<'_> {
        AudioMixer::new(&self.ffmpeg, &self.config.audio, &self.config.encoder.audio_bitrate)
    }

    /// Log the plan the way `--dry_run` shows it
    pub fn describe(&self, plan: &GalleryPlan) {
        let frame = self.config.frame_size();
        info!(
            "Plan: {} images, {}x{} @ {} fps, {:.2}s total{}",
            plan.timeline.len(),
            frame.width,
            frame.height,
            self.config.fps,
            plan.total_duration(),
            if plan.soundtrack.is_some() { "" } else { ", silent" }
        );

        for segment in plan.timeline.segments() {
            let entries = plan.timeline.entries();
            match segment {
                Segment::Hold {
                    clip,
                    start,
                    duration,
                } => {
                    let placed = &entries[clip].clip;
                    info!(
                        "   {:>8.2}s  hold      {} for {:.2}s at ({}, {}) {}x{}",
                        start,
                        placed.source.file_name,
                        duration,
                        placed.placement.x,
                        placed.placement.y,
                        placed.placement.width,
                        placed.placement.height
                    );
                }
                Segment::Crossfade {
                    from,
                    to,
                    start,
                    duration,
                } => {
                    info!(
                        "   {:>8.2}s  crossfade {} -> {} over {:.2}s",
                        start,
                        entries[from].clip.source.file_name,
                        entries[to].clip.source.file_name,
                        duration
                    );
                }
            }
        }

        for cue in &plan.title_cues {
            info!("   title '{}' {:.2}s - {:.2}s", cue.text, cue.start, cue.end);
        }

        if let Some(track) = &plan.soundtrack {
            debug!("   soundtrack {:?}", track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ClipKind;
    use image::{Rgb, RgbImage};
    use tempfile::{tempdir, TempDir};

    fn workspace(images: &[&str]) -> (TempDir, Config) {
        let root = tempdir().unwrap();
        let images_dir = root.path().join("images");
        std::fs::create_dir_all(&images_dir).unwrap();
        for name in images {
            RgbImage::from_pixel(160, 90, Rgb([10, 20, 30]))
                .save_with_format(images_dir.join(name), image::ImageFormat::Jpeg)
                .unwrap();
        }

        let mut config = Config::default();
        config.paths.images_dir = images_dir;
        config.paths.sound_dir = root.path().join("sound");
        config.paths.output_dir = root.path().join("output");
        config.paths.scratch_dir = root.path().to_path_buf();
        config.title.file = root.path().join("titles.txt");
        (root, config)
    }

    fn no_ffmpeg() -> Ffmpeg {
        Ffmpeg::new("/nonexistent/ffmpeg-binary")
    }

    #[test]
    fn test_four_images_plan_fifteen_silent_seconds() {
        let (_root, mut config) = workspace(&["c.jpg", "a.jpg", "d.jpg", "b.jpg"]);
        config.duration = 3.0;
        config.crossfade = 1.0;

        let plan = GalleryPipeline::new(config).plan().unwrap();
        assert_eq!(plan.total_duration(), 15.0);
        assert!(plan.soundtrack.is_none());
        assert!(plan.title_cues.is_empty());

        let names: Vec<_> = plan
            .timeline
            .entries()
            .iter()
            .map(|e| e.clip.source.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    }

    #[test]
    fn test_empty_images_halts_without_output() {
        let (root, config) = workspace(&[]);
        let output_dir = config.paths.output_dir.clone();

        let err = GalleryPipeline::with_ffmpeg(config, no_ffmpeg()).run().unwrap_err();
        assert!(err.is_empty_input());
        assert_eq!(std::fs::read_dir(&output_dir).unwrap().count(), 0);
        assert!(root.path().join("sound").is_dir());
    }

    #[test]
    fn test_missing_directories_are_created() {
        let root = tempdir().unwrap();
        let mut config = Config::default();
        config.paths.images_dir = root.path().join("images");
        config.paths.sound_dir = root.path().join("sound");
        config.paths.output_dir = root.path().join("output");
        config.title.file = root.path().join("titles.txt");

        let err = GalleryPipeline::new(config).plan().unwrap_err();
        assert!(err.is_empty_input());
        for dir in ["images", "sound", "output"] {
            assert!(root.path().join(dir).is_dir());
        }
    }

    #[test]
    fn test_title_attaches_to_matching_image_only() {
        let (root, config) = workspace(&["a.jpg", "b.jpg", "c.jpg"]);
        std::fs::write(root.path().join("titles.txt"), "a.jpg:Summer Trip\nbogus line\n").unwrap();

        let plan = GalleryPipeline::new(config).plan().unwrap();
        let kinds: Vec<_> = plan.timeline.entries().iter().map(|e| e.clip.kind.clone()).collect();

        assert!(matches!(&kinds[0], ClipKind::Titled { text, .. } if text == "Summer Trip"));
        assert_eq!(kinds[1], ClipKind::Plain);
        assert_eq!(kinds[2], ClipKind::Plain);
        assert_eq!(plan.title_cues.len(), 1);
        assert_eq!(plan.title_cues[0].text, "Summer Trip");
    }

    #[test]
    fn test_first_mp3_becomes_soundtrack() {
        let (root, config) = workspace(&["a.jpg"]);
        let sound = root.path().join("sound");
        std::fs::create_dir_all(&sound).unwrap();
        std::fs::write(sound.join("song.mp3"), b"id3").unwrap();
        std::fs::write(sound.join("readme.txt"), b"not audio").unwrap();

        let plan = GalleryPipeline::new(config).plan().unwrap();
        assert_eq!(plan.soundtrack.as_deref(), Some(sound.join("song.mp3").as_path()));
    }

    #[test]
    fn test_run_requires_ffmpeg_before_media_work() {
        let (root, config) = workspace(&["a.jpg"]);
        let err = GalleryPipeline::with_ffmpeg(config, no_ffmpeg()).run().unwrap_err();

        assert!(matches!(
            err,
            crate::error::GalleryError::Render(crate::error::RenderError::FfmpegMissing)
        ));
        let leftovers: Vec<_> = std::fs::read_dir(root.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".video_gallery_"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
