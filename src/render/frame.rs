use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage, RgbaImage};

use crate::color::Color;

/// A single RGB video frame
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a frame filled with `color`
    pub fn new_filled(width: u32, height: u32, color: Color) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb(color.to_array()));
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Fill a rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        let pixel = Rgb(color.to_array());

        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.buffer.put_pixel(px, py, pixel);
            }
        }
    }

    /// Paint a border `margin` pixels wide around the frame edge
    pub fn draw_margin_band(&mut self, margin: u32, color: Color) {
        if margin == 0 {
            return;
        }
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w, margin, color);
        self.fill_rect(0, h.saturating_sub(margin), w, margin, color);
        self.fill_rect(0, 0, margin, h, color);
        self.fill_rect(w.saturating_sub(margin), 0, margin, h, color);
    }

    /// Alpha-composite `image` with its top-left corner at (`x`, `y`)
    pub fn overlay(&mut self, image: &RgbaImage, x: u32, y: u32) {
        for (ix, iy, src) in image.enumerate_pixels() {
            let (px, py) = (x + ix, y + iy);
            if px >= self.width() || py >= self.height() {
                continue;
            }

            let alpha = src[3] as u32;
            let dst = self.buffer.get_pixel_mut(px, py);
            for c in 0..3 {
                let mixed = src[c] as u32 * alpha + dst[c] as u32 * (255 - alpha);
                dst[c] = ((mixed + 127) / 255) as u8;
            }
        }
    }

    /// Linear mix: `progress` 0.0 is all `from`, 1.0 is all `to`
    ///
    /// Both frames must have the same dimensions.
    pub fn blend(from: &Frame, to: &Frame, progress: f32) -> Frame {
        let t = progress.clamp(0.0, 1.0);
        let buffer = ImageBuffer::from_fn(from.width(), from.height(), |x, y| {
            let a = from.buffer.get_pixel(x, y);
            let b = to.buffer.get_pixel(x, y);
            Rgb([
                (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
                (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
                (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
            ])
        });
        Frame { buffer }
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }
}
