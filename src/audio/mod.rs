//! # Soundtrack Handling
//!
//! Measures the soundtrack, transcodes it to AAC and shapes it to the length
//! of the video.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use video_gallery::audio::AudioProbe;
//!
//! # fn main() -> anyhow::Result<()> {
//! let seconds = AudioProbe::duration("sound/track.mp3")?;
//! println!("Soundtrack runs {:.1}s", seconds);
//! # Ok(())
//! # }
//! ```

pub mod mixer;
pub mod probe;

pub use mixer::{AudioMixer, AudioTrack};
pub use probe::AudioProbe;
