use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::audio::AudioTrack;
use crate::config::{Config, FontWeight, SizePreset};
use crate::error::{RenderError, Result};
use crate::ffmpeg::{path_arg, quote_filter_value, seconds, Ffmpeg};
use crate::layout::title_band_offset;
use crate::render::compositor::FrameSequence;
use crate::scratch::ScratchDir;
use crate::timeline::TitleCue;

pub const VIDEO_CODEC: &str = "libx264";
pub const AUDIO_CODEC: &str = "aac";
pub const CONTAINER_EXTENSION: &str = "mp4";

/// Represents an encoded video output
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: PathBuf,
    pub duration: f64,
    pub frame_count: usize,
    pub file_size: u64,
    pub has_audio: bool,
}

/// `video_gallery_<size>_<YYYYMMDD_HHMMSS>.mp4`
pub fn output_file_name(size: SizePreset, at: DateTime<Local>) -> String {
    format!(
        "video_gallery_{}_{}.{}",
        size.label(),
        at.format("%Y%m%d_%H%M%S"),
        CONTAINER_EXTENSION
    )
}

/// A title cue whose text has been written to disk for `drawtext`
#[derive(Debug, Clone)]
pub struct PreparedTitle<'a> {
    pub cue: &'a TitleCue,
    pub text_file: PathBuf,
}

/// Encodes rendered frames, titles and soundtrack into the final file
pub struct Exporter<'a> {
    config: &'a Config,
    ffmpeg: &'a Ffmpeg,
}

impl<'a> Exporter<'a> {
    pub fn new(config: &'a Config, ffmpeg: &'a Ffmpeg) -> Self {
        Self { config, ffmpeg }
    }

    /// Where the output for a run started at `at` goes
    pub fn output_path(&self, at: DateTime<Local>) -> PathBuf {
        self.config
            .paths
            .output_dir
            .join(output_file_name(self.config.size, at))
    }

    /// Run the encode; blocks until ffmpeg exits
    pub fn export(
        &self,
        frames: &FrameSequence,
        audio: Option<&AudioTrack>,
        cues: &[TitleCue],
        total_duration: f64,
        scratch: &ScratchDir,
        output_path: &Path,
    ) -> Result<EncodedVideo> {
        info!("🎬 Encoding {:?}", output_path);

        let titles = write_title_files(cues, scratch)?;
        let args = self.encode_args(frames, audio, &titles, total_duration, output_path);

        if let Err(reason) = self.ffmpeg.run(&args) {
            remove_partial_output(output_path);
            return Err(RenderError::EncodingFailed { reason }.into());
        }

        let file_size = std::fs::metadata(output_path)?.len();
        let encoded = EncodedVideo {
            path: output_path.to_path_buf(),
            duration: total_duration,
            frame_count: frames.frame_count(),
            file_size,
            has_audio: audio.is_some(),
        };

        info!(
            "   ✅ {:.1}s video, {:.1} MB{}",
            encoded.duration,
            encoded.file_size as f64 / 1024.0 / 1024.0,
            if encoded.has_audio { "" } else { ", silent" }
        );
        Ok(encoded)
    }

    /// Full ffmpeg argument list for the encode
    pub fn encode_args(
        &self,
        frames: &FrameSequence,
        audio: Option<&AudioTrack>,
        titles: &[PreparedTitle<'_>],
        total_duration: f64,
        output_path: &Path,
    ) -> Vec<String> {
        let fps = self.config.fps.to_string();
        let mut args: Vec<String> = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            path_arg(&frames.list_path),
        ];

        if let Some(track) = audio {
            args.extend(["-i".to_string(), path_arg(&track.path)]);
        }

        args.extend(["-filter_complex".to_string(), self.filter_graph(audio, titles)]);
        args.extend(["-map".to_string(), "[vout]".to_string()]);
        if audio.is_some() {
            args.extend(["-map".to_string(), "[aout]".to_string()]);
        }

        args.extend([
            "-c:v".to_string(),
            VIDEO_CODEC.to_string(),
            "-crf".to_string(),
            self.config.encoder.crf().to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-r".to_string(),
            fps,
        ]);

        if audio.is_some() {
            args.extend([
                "-c:a".to_string(),
                AUDIO_CODEC.to_string(),
                "-b:a".to_string(),
                self.config.encoder.audio_bitrate.clone(),
            ]);
        } else {
            args.push("-an".to_string());
        }

        args.extend([
            "-t".to_string(),
            seconds(total_duration),
            "-movflags".to_string(),
            "+faststart".to_string(),
            path_arg(output_path),
        ]);

        args
    }

    /// Video chain (CFR + titles) and, with a soundtrack, the audio chain
    pub fn filter_graph(&self, audio: Option<&AudioTrack>, titles: &[PreparedTitle<'_>]) -> String {
        let mut video = vec![
            format!("fps={}", self.config.fps),
            "format=yuv420p".to_string(),
        ];
        video.extend(titles.iter().map(|title| self.drawtext(title)));

        let mut graph = format!("[0:v]{}[vout]", video.join(","));
        if let Some(track) = audio {
            graph.push_str(&format!(";[1:a]{}[aout]", track.filter_chain()));
        }

        debug!("Filter graph: {}", graph);
        graph
    }

    fn drawtext(&self, title: &PreparedTitle<'_>) -> String {
        let cue = title.cue;
        let style = &cue.style;

        let font = match &style.font_file {
            Some(file) => format!("fontfile={}", quote_filter_value(&path_arg(file))),
            None => {
                let pattern = match style.font_weight {
                    FontWeight::Normal => style.font.clone(),
                    FontWeight::Bold => format!("{}:style=Bold", style.font),
                };
                format!("font={}", quote_filter_value(&pattern))
            }
        };

        let (start, end, fade) = (seconds(cue.start), seconds(cue.end), seconds(cue.fade));
        let alpha = if cue.fade > 0.0 {
            format!(
                "if(lt(t,{start}+{fade}),(t-{start})/{fade},\
                 if(gt(t,{end}-{fade}),({end}-t)/{fade},1))"
            )
        } else {
            "1".to_string()
        };

        let options = [
            format!("textfile={}", quote_filter_value(&path_arg(&title.text_file))),
            "expansion=none".to_string(),
            font,
            format!("fontsize={}", style.font_size),
            format!("fontcolor={}", style.color.to_ffmpeg()),
            "x=(w-text_w)/2".to_string(),
            format!("y=h-text_h-{}", title_band_offset(self.config.margin)),
            format!(
                "enable={}",
                quote_filter_value(&format!("between(t,{},{})", start, end))
            ),
            format!("alpha={}", quote_filter_value(&alpha)),
        ];
        format!("drawtext={}", options.join(":"))
    }
}

/// Best-effort removal of whatever a failed encode left behind
fn remove_partial_output(path: &Path) {
    if path.exists() {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Removed partial output {:?}", path),
            Err(e) => warn!("Failed to remove partial output {:?}: {}", path, e),
        }
    }
}

/// One text file per cue, so titles never need filter escaping
fn write_title_files<'a>(
    cues: &'a [TitleCue],
    scratch: &ScratchDir,
) -> Result<Vec<PreparedTitle<'a>>> {
    cues.iter()
        .map(|cue| {
            let text_file = scratch.join(format!("title_{:05}.txt", cue.clip));
            std::fs::write(&text_file, &cue.text)?;
            Ok(PreparedTitle { cue, text_file })
        })
        .collect()
}
