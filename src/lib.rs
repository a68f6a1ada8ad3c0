//! # Video Gallery
//!
//! Turn a folder of still images into a crossfaded slideshow video, with optional
//! per-image titles and a soundtrack.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use video_gallery::{config::Config, pipeline::GalleryPipeline};
//!
//! # fn main() -> video_gallery::Result<()> {
//! let config = Config::default();
//! let video = GalleryPipeline::new(config).run()?;
//! println!("wrote {:?} ({:.1}s)", video.path, video.duration);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line flags resolved into a [`Config`]
//! - [`assets`] - Image, soundtrack and title discovery
//! - [`layout`] - Fitting images into the output frame
//! - [`timeline`] - Hold and crossfade sequencing
//! - [`audio`] - Soundtrack probing, transcoding and fades
//! - [`render`] - Frame compositing and ffmpeg export
//! - [`pipeline`] - The end-to-end run

pub mod assets;
pub mod audio;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod scratch;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    color::Color,
    config::Config,
    error::{GalleryError, Result},
    pipeline::{GalleryPipeline, GalleryPlan},
};
