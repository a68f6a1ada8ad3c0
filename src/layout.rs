//! # Layout Engine
//!
//! Fits each image inside the output frame without upscaling and decides where
//! it (and its title, if any) lands.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    assets::{ImageAsset, TitleMap},
    config::{Config, TitleStyle},
    error::{LayoutError, Result},
};

/// Output frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Where a scaled image sits inside the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,

    /// Uniform scale applied to the natural size, never above 1
    pub scale: f64,
}

/// A plain image, or an image with a title drawn over it
#[derive(Debug, Clone, PartialEq)]
pub enum ClipKind {
    Plain,
    Titled { text: String, style: TitleStyle },
}

impl ClipKind {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Plain => None,
            Self::Titled { text, .. } => Some(text),
        }
    }
}

/// An image ready to be put on the timeline
#[derive(Debug, Clone)]
pub struct PlacedClip {
    pub source: ImageAsset,

    /// Time the image is fully visible (seconds)
    pub duration: f64,

    pub placement: Placement,
    pub kind: ClipKind,
}

impl PlacedClip {
    /// Margin band is only drawn around untitled frames
    pub fn draws_margin_band(&self) -> bool {
        matches!(self.kind, ClipKind::Plain)
    }
}

/// Largest scale that fits `natural` inside `frame` minus `margin` on every side
///
/// Capped at 1.0 so small images keep their natural size.
pub fn scale_factor(natural: (u32, u32), frame: FrameSize, margin: u32) -> f64 {
    let (width, height) = natural;
    let available_w = frame.width.saturating_sub(margin.saturating_mul(2)) as f64;
    let available_h = frame.height.saturating_sub(margin.saturating_mul(2)) as f64;

    let scale = (available_w / width as f64).min(available_h / height as f64);
    scale.min(1.0)
}

/// Scale and center an image of `natural` size inside `frame`
pub fn fit(natural: (u32, u32), frame: FrameSize, margin: u32) -> Placement {
    let scale = scale_factor(natural, frame, margin);

    let width = ((natural.0 as f64 * scale).round() as u32).max(1);
    let height = ((natural.1 as f64 * scale).round() as u32).max(1);

    Placement {
        x: frame.width.saturating_sub(width) / 2,
        y: frame.height.saturating_sub(height) / 2,
        width,
        height,
        scale,
    }
}

/// Distance from the bottom of the frame to the bottom edge of a title
pub fn title_band_offset(margin: u32) -> u32 {
    margin * 3
}

/// Lay out every image, attaching titles by filename
pub fn place_all(
    images: &[ImageAsset],
    titles: &TitleMap,
    config: &Config,
) -> Result<Vec<PlacedClip>> {
    let frame = config.frame_size();

    images
        .iter()
        .map(|asset| {
            if asset.width == 0 || asset.height == 0 {
                return Err(LayoutError::EmptyImage {
                    path: asset.path.display().to_string(),
                }
                .into());
            }

            let placement = fit((asset.width, asset.height), frame, config.margin);
            let kind = match titles.get(&asset.file_name) {
                Some(text) => ClipKind::Titled {
                    text: text.to_string(),
                    style: config.title.style.clone(),
                },
                None => ClipKind::Plain,
            };

            debug!(
                "{}: {}x{} -> {}x{} at ({}, {}), scale {:.3}{}",
                asset.file_name,
                asset.width,
                asset.height,
                placement.width,
                placement.height,
                placement.x,
                placement.y,
                placement.scale,
                kind.title().map(|t| format!(", title '{}'", t)).unwrap_or_default()
            );

            Ok(PlacedClip {
                source: asset.clone(),
                duration: config.duration,
                placement,
                kind,
            })
        })
        .collect()
}
