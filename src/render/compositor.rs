use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AssetError, RenderError, Result};
use crate::layout::PlacedClip;
use crate::render::frame::Frame;
use crate::scratch::ScratchDir;
use crate::timeline::{Segment, Timeline};

/// One image in the concat list and how long it stays on screen
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEntry {
    pub path: PathBuf,
    pub duration: f64,
}

/// Rendered frames, ready for the concat demuxer
#[derive(Debug, Clone)]
pub struct FrameSequence {
    pub list_path: PathBuf,
    pub entries: Vec<FrameEntry>,
}

impl FrameSequence {
    pub fn duration(&self) -> f64 {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// Number of distinct PNGs written
    pub fn frame_count(&self) -> usize {
        self.entries.len()
    }
}

/// Paints clips onto full-size frames
pub struct FrameCompositor<'a> {
    config: &'a Config,
    pool: rayon::ThreadPool,
}

impl<'a> FrameCompositor<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.encoder.threads)
            .build()
            .map_err(|e| RenderError::ThreadPool { reason: e.to_string() })?;
        Ok(Self { config, pool })
    }

    /// Background, margin band and the scaled image, as one frame
    pub fn render_still(&self, clip: &PlacedClip) -> Result<Frame> {
        let frame_size = self.config.frame_size();
        let mut frame =
            Frame::new_filled(frame_size.width, frame_size.height, self.config.background);

        if clip.draws_margin_band() {
            frame.draw_margin_band(self.config.margin, self.config.margin_color);
        }

        let source = image::open(&clip.source.path)
            .map_err(|e| AssetError::Unreadable {
                path: clip.source.path.display().to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();

        let placement = clip.placement;
        let scaled = if source.dimensions() == (placement.width, placement.height) {
            source
        } else {
            let (width, height) = (placement.width, placement.height);
            image::imageops::resize(&source, width, height, FilterType::Lanczos3)
        };

        frame.overlay(&scaled, placement.x, placement.y);
        Ok(frame)
    }

    /// Write every frame of `timeline` into `scratch` and list them
    ///
    /// A hold becomes one PNG shown for its whole span; a crossfade becomes
    /// `round(duration * fps)` blended PNGs.
    pub fn render(&self, timeline: &Timeline, scratch: &ScratchDir) -> Result<FrameSequence> {
        info!("🎨 Rendering {} clips...", timeline.len());

        let mut stills = StillCache::default();
        let entries = self.render_segments(timeline, scratch, &mut stills)?;
        debug!("Peak of {} stills held in memory", stills.peak);

        let list_path = scratch.join("frames.txt");
        write_frame_list(&entries, &list_path)?;

        let sequence = FrameSequence { list_path, entries };
        info!(
            "   ✅ {} frames written, {:.2}s of video",
            sequence.frame_count(),
            sequence.duration()
        );
        Ok(sequence)
    }

    fn render_segments(
        &self,
        timeline: &Timeline,
        scratch: &ScratchDir,
        stills: &mut StillCache,
    ) -> Result<Vec<FrameEntry>> {
        let mut entries = Vec::new();

        for segment in timeline.segments() {
            match segment {
                Segment::Hold { clip, duration, .. } => {
                    // Clips are visited in order; earlier stills are never needed again
                    stills.evict_before(clip);
                    let path = scratch.join(format!("hold_{:05}.png", clip));
                    write_png(self.still(stills, timeline, clip)?, &path)?;
                    entries.push(FrameEntry { path, duration });
                }
                Segment::Crossfade { from, to, duration, .. } => {
                    self.still(stills, timeline, from)?;
                    self.still(stills, timeline, to)?;
                    let (outgoing, incoming) = (&stills.frames[&from], &stills.frames[&to]);
                    let faded = self.render_crossfade(outgoing, incoming, from, duration, scratch)?;
                    entries.extend(faded);
                    stills.evict_before(to);
                }
            }
        }

        Ok(entries)
    }

    fn still<'c>(
        &self,
        stills: &'c mut StillCache,
        timeline: &Timeline,
        index: usize,
    ) -> Result<&'c Frame> {
        if !stills.frames.contains_key(&index) {
            let entry = &timeline.entries()[index];
            debug!("Compositing still for {}", entry.clip.source.file_name);
            let frame = self.render_still(&entry.clip)?;
            stills.insert(index, frame);
        }
        Ok(&stills.frames[&index])
    }

    fn render_crossfade(
        &self,
        from: &Frame,
        to: &Frame,
        index: usize,
        duration: f64,
        scratch: &ScratchDir,
    ) -> Result<Vec<FrameEntry>> {
        let steps = crossfade_steps(duration, self.config.fps);
        let step_duration = duration / steps as f64;

        debug!("Crossfade {} -> {}: {} frames", index, index + 1, steps);

        self.pool.install(|| {
            (0..steps)
                .into_par_iter()
                .map(|step| {
                    let progress = (step as f32 + 0.5) / steps as f32;
                    let path = scratch.join(format!("fade_{:05}_{:05}.png", index, step));
                    write_png(&Frame::blend(from, to, progress), &path)?;
                    Ok(FrameEntry {
                        path,
                        duration: step_duration,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
    }
}

/// Full-frame stills that are still needed, keyed by clip index
#[derive(Default)]
struct StillCache {
    frames: BTreeMap<usize, Frame>,
    peak: usize,
}

impl StillCache {
    fn insert(&mut self, index: usize, frame: Frame) {
        self.frames.insert(index, frame);
        self.peak = self.peak.max(self.frames.len());
    }

    fn evict_before(&mut self, index: usize) {
        self.frames.retain(|&i, _| i >= index);
    }
}

/// Number of blended frames in a crossfade, at least one
pub fn crossfade_steps(duration: f64, fps: u32) -> usize {
    ((duration * fps as f64).round() as usize).max(1)
}

fn write_png(frame: &Frame, path: &Path) -> Result<()> {
    frame.save_png(path).map_err(|e| {
        RenderError::FrameWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Concat demuxer script: each file with its duration, last file repeated
fn write_frame_list(entries: &[FrameEntry], list_path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(list_path)?);
    writeln!(file, "ffconcat version 1.0")?;

    for entry in entries {
        writeln!(file, "file '{}'", concat_path(&entry.path))?;
        writeln!(file, "duration {:.6}", entry.duration)?;
    }

    // The demuxer ignores the final duration unless the last file repeats
    if let Some(last) = entries.last() {
        writeln!(file, "file '{}'", concat_path(&last.path))?;
    }

    file.flush()?;
    Ok(())
}

fn concat_path(path: &Path) -> String {
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    absolute.display().to_string().replace('\'', "'\\''")
}
