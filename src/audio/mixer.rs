use std::path::{Path, PathBuf};

use tracing::info;

use crate::audio::probe::AudioProbe;
use crate::config::AudioConfig;
use crate::error::{AudioError, Result};
use crate::ffmpeg::{path_arg, seconds, Ffmpeg};
use crate::scratch::ScratchDir;

/// A soundtrack ready to be muxed under the video
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    /// The file found in the sound directory
    pub source: PathBuf,

    /// AAC transcode that ffmpeg actually reads
    pub path: PathBuf,

    /// Length of the source in seconds
    pub source_duration: f64,

    /// Length after fitting to the video
    pub duration: f64,

    pub fade_in: f64,
    pub fade_out: f64,
}

impl AudioTrack {
    pub fn new(source: PathBuf, path: PathBuf, source_duration: f64, fades: &AudioConfig) -> Self {
        Self {
            source,
            path,
            source_duration,
            duration: source_duration,
            fade_in: fades.fade_in,
            fade_out: fades.fade_out,
        }
    }

    /// Truncate to `total` seconds if longer; shorter tracks are left alone
    pub fn fit_to(mut self, total: f64) -> Self {
        if self.source_duration > total {
            self.duration = total;
        }
        self
    }

    pub fn is_truncated(&self) -> bool {
        self.duration < self.source_duration
    }

    /// Audio filter chain (without pad labels) applying trim and fades
    ///
    /// The fade-out ends with the track, so a truncated track fades out at
    /// the cut point rather than at the source's end.
    pub fn filter_chain(&self) -> String {
        let mut filters = vec![
            format!("atrim=0:{}", seconds(self.duration)),
            "asetpts=PTS-STARTPTS".to_string(),
        ];

        let fade_in = self.fade_in.min(self.duration);
        if fade_in > 0.0 {
            filters.push(format!("afade=t=in:st=0:d={}", seconds(fade_in)));
        }

        let fade_out = self.fade_out.min(self.duration);
        if fade_out > 0.0 {
            filters.push(format!(
                "afade=t=out:st={}:d={}",
                seconds(self.duration - fade_out),
                seconds(fade_out)
            ));
        }

        filters.join(",")
    }
}

/// Prepares the soundtrack for export
pub struct AudioMixer<'a> {
    ffmpeg: &'a Ffmpeg,
    fades: &'a AudioConfig,
    bitrate: &'a str,
}

impl<'a> AudioMixer<'a> {
    pub fn new(ffmpeg: &'a Ffmpeg, fades: &'a AudioConfig, bitrate: &'a str) -> Self {
        Self { ffmpeg, fades, bitrate }
    }

    /// Measure, transcode and fit `source` to a video of `total` seconds
    pub fn prepare(&self, source: &Path, scratch: &ScratchDir, total: f64) -> Result<AudioTrack> {
        info!("🎵 Preparing soundtrack {:?}", source);

        let source_duration = AudioProbe::duration(source)?;
        let transcoded = scratch.audio_path();
        self.transcode(source, &transcoded)?;

        let track = AudioTrack::new(source.to_path_buf(), transcoded, source_duration, self.fades)
            .fit_to(total);

        if track.is_truncated() {
            info!(
                "   Soundtrack {:.2}s truncated to {:.2}s",
                track.source_duration, track.duration
            );
        } else {
            info!("   Soundtrack {:.2}s (video {:.2}s)", track.source_duration, total);
        }

        Ok(track)
    }

    /// Re-encode to AAC in an MP4 audio container
    pub fn transcode(&self, source: &Path, target: &Path) -> Result<()> {
        self.ffmpeg
            .run(self.transcode_args(source, target))
            .map_err(|reason| AudioError::TranscodeFailed { reason })?;
        Ok(())
    }

    fn transcode_args(&self, source: &Path, target: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-i".to_string(),
            path_arg(source),
            "-vn".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            self.bitrate.to_string(),
            "-f".to_string(),
            "ipod".to_string(),
            path_arg(target),
        ]
    }
}
