//! Signature capture on a fixed-size raster surface
//!
//! Pointer-down/move/up events become connected line segments; the surface
//! is exported as a PNG data URL after each stroke ends. No stroke-level
//! undo: clearing wipes the whole surface.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use super::{encode_data_url, CaptureError};

pub const SIGNATURE_WIDTH: u32 = 600;
pub const SIGNATURE_HEIGHT: u32 = 200;

const INK: [u8; 3] = [0x1E, 0x29, 0x3B];
const PAPER: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Freehand signature surface
pub struct SignaturePad {
    canvas: RgbImage,
    last_point: Option<(f32, f32)>,
    has_ink: bool,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new()
    }
}

impl SignaturePad {
    pub fn new() -> Self {
        Self {
            canvas: RgbImage::from_pixel(SIGNATURE_WIDTH, SIGNATURE_HEIGHT, image::Rgb(PAPER)),
            last_point: None,
            has_ink: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_ink
    }

    /// Begin a stroke at the given surface coordinates
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.plot(x, y);
        self.last_point = Some((x, y));
        self.has_ink = true;
    }

    /// Continue the current stroke; ignored when no stroke is active
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some((px, py)) = self.last_point else {
            return;
        };
        self.line(px, py, x, y);
        self.last_point = Some((x, y));
    }

    /// End the stroke and export the surface as a PNG data URL
    pub fn pointer_up(&mut self) -> Result<Option<String>, CaptureError> {
        if self.last_point.take().is_none() {
            return Ok(None);
        }
        self.export_data_url().map(Some)
    }

    /// Wipe the surface; the caller clears the stored signature in turn
    pub fn clear(&mut self) {
        self.canvas = RgbImage::from_pixel(SIGNATURE_WIDTH, SIGNATURE_HEIGHT, image::Rgb(PAPER));
        self.last_point = None;
        self.has_ink = false;
    }

    /// Rasterized surface as a PNG data URL
    pub fn export_data_url(&self) -> Result<String, CaptureError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.canvas.as_raw(),
            SIGNATURE_WIDTH,
            SIGNATURE_HEIGHT,
            ExtendedColorType::Rgb8,
        )?;
        Ok(encode_data_url("image/png", &bytes))
    }

    /// Connected line segment between two points (simple DDA walk)
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.plot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
        }
    }

    /// 2x2 dot so thin terminal-driven strokes stay legible
    fn plot(&mut self, x: f32, y: f32) {
        let (cx, cy) = (x.round() as i64, y.round() as i64);
        for dy in 0..2 {
            for dx in 0..2 {
                let (px, py) = (cx + dx, cy + dy);
                if px >= 0
                    && py >= 0
                    && (px as u32) < SIGNATURE_WIDTH
                    && (py as u32) < SIGNATURE_HEIGHT
                {
                    self.canvas.put_pixel(px as u32, py as u32, image::Rgb(INK));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::parse_data_url;

    #[test]
    fn test_stroke_exports_png_data_url() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(10.0, 10.0);
        pad.pointer_move(120.0, 60.0);
        let url = pad.pointer_up().unwrap().unwrap();

        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        // PNG magic
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        assert!(!pad.is_empty());
    }

    #[test]
    fn test_pointer_up_without_stroke_is_a_no_op() {
        let mut pad = SignaturePad::new();
        assert!(pad.pointer_up().unwrap().is_none());
        assert!(pad.is_empty());
    }

    #[test]
    fn test_clear_wipes_the_surface() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(50.0, 50.0);
        pad.pointer_up().unwrap();
        assert!(!pad.is_empty());

        pad.clear();
        assert!(pad.is_empty());
        // Surface is back to paper color everywhere
        assert!(pad.canvas.pixels().all(|p| p.0 == PAPER));
    }

    #[test]
    fn test_out_of_bounds_points_are_clipped() {
        let mut pad = SignaturePad::new();
        pad.pointer_down(-10.0, -10.0);
        pad.pointer_move(10_000.0, 10_000.0);
        // Must not panic; export still works
        assert!(pad.pointer_up().unwrap().is_some());
    }
}
