//! # Rendering
//!
//! Turns a [`Timeline`](crate::timeline::Timeline) into PNG frames and hands
//! them to ffmpeg for encoding.
//!
//! Still images are composited once per clip; crossfades are blended frame by
//! frame in parallel. Everything else (scaling to CFR, title text, audio
//! muxing) happens inside a single ffmpeg run.

pub mod compositor;
pub mod exporter;
pub mod frame;

pub use compositor::{FrameCompositor, FrameEntry, FrameSequence};
pub use exporter::{output_file_name, EncodedVideo, Exporter};
pub use frame::Frame;
