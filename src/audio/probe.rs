use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{AudioError, Result};

/// Reads soundtrack metadata with Symphonia
pub struct AudioProbe;

impl AudioProbe {
    /// Playing time of an audio file in seconds
    ///
    /// Uses the container's frame count when present, otherwise decodes the
    /// stream and counts frames.
    pub fn duration<P: AsRef<Path>>(path: P) -> Result<f64> {
        let path = path.as_ref();
        let load_failed = || AudioError::LoadFailed {
            path: path.display().to_string(),
        };

        let file = File::open(path).map_err(|_| load_failed())?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|_| load_failed())?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(load_failed)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params.sample_rate.ok_or_else(|| AudioError::UnknownDuration {
            path: path.display().to_string(),
        })?;

        if let Some(n_frames) = codec_params.n_frames {
            let duration = n_frames as f64 / sample_rate as f64;
            debug!("{:?}: {} frames @ {} Hz = {:.3}s", path, n_frames, sample_rate, duration);
            return Ok(duration);
        }

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &dec_opts)
            .map_err(|_| load_failed())?;

        let mut frames: u64 = 0;
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(_) => break,
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => frames += decoded.frames() as u64,
                Err(SymphoniaError::DecodeError(_)) => continue,
                Err(_) => break,
            }
        }

        if frames == 0 {
            return Err(AudioError::UnknownDuration {
                path: path.display().to_string(),
            }
            .into());
        }

        let duration = frames as f64 / sample_rate as f64;
        debug!("{:?}: decoded {} frames @ {} Hz = {:.3}s", path, frames, sample_rate, duration);
        Ok(duration)
    }
}
