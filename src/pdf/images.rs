//! Image measurement and embedding for the report PDF

use lopdf::{Dictionary, Document, Object, Stream};

use super::PdfError;
use crate::capture::parse_data_url;

/// Fixed conversion factor from image pixels to page millimeters
pub const PX_TO_MM: f32 = 0.264583;

/// An image registered with the document, ready to be painted
pub struct EmbeddedImage {
    pub id: lopdf::ObjectId,
    pub width_px: u32,
    pub height_px: u32,
}

impl EmbeddedImage {
    /// Scale the natural pixel dimensions to fit within the given caps
    /// while preserving aspect ratio, then convert to millimeters.
    pub fn fit(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        fit(self.width_px, self.height_px, max_width, max_height)
    }
}

/// Decode a data URL, measure it, and add it to the document as an
/// image XObject. JPEG payloads embed as DCT streams unchanged;
/// everything else is flattened to 8-bit RGB.
pub fn embed_data_url(doc: &mut Document, data_url: &str) -> Result<EmbeddedImage, PdfError> {
    let (mime, bytes) = parse_data_url(data_url)?;
    let decoded = image::load_from_memory(&bytes)?;
    let (width_px, height_px) = (decoded.width(), decoded.height());

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width_px as i64));
    dict.set("Height", Object::Integer(height_px as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let stream = if mime == "image/jpeg" {
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        Stream::new(dict, bytes)
    } else {
        // Raw RGB rows; Document::compress() deflates them on save
        Stream::new(dict, decoded.to_rgb8().into_raw())
    };

    let id = doc.add_object(Object::Stream(stream));
    Ok(EmbeddedImage {
        id,
        width_px,
        height_px,
    })
}

/// Fit-to-caps scaling followed by the px→mm conversion.
///
/// The caps are compared against raw pixel counts before the unit
/// conversion, matching the measurement behavior of the rendered
/// documents this layout reproduces.
pub fn fit(width_px: u32, height_px: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    let mut width = width_px as f32;
    let mut height = height_px as f32;
    let aspect = width / height;

    if width > max_width {
        width = max_width;
        height = width / aspect;
    }
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }

    (width * PX_TO_MM, height * PX_TO_MM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let (w, h) = fit(4000, 3000, 180.0, 70.0);
        assert!((w / h - 4.0 / 3.0).abs() < 0.01);
        // Height cap binds: 70 px-units tall, converted to mm
        assert!((h - 70.0 * PX_TO_MM).abs() < 0.01);
    }

    #[test]
    fn test_fit_leaves_small_images_untouched() {
        let (w, h) = fit(100, 50, 180.0, 70.0);
        assert!((w - 100.0 * PX_TO_MM).abs() < 0.001);
        assert!((h - 50.0 * PX_TO_MM).abs() < 0.001);
    }

    #[test]
    fn test_fit_width_cap() {
        let (w, _h) = fit(400, 100, 180.0, 700.0);
        assert!((w - 180.0 * PX_TO_MM).abs() < 0.001);
    }
}
