//! Photo and signature capture
//!
//! Both components hand their result to the wizard as a base64 data URL,
//! the one image currency the record store and the PDF renderer share.

mod camera;
mod signature;

pub use camera::CameraCapture;
pub use signature::{SignaturePad, SIGNATURE_HEIGHT, SIGNATURE_WIDTH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Datei konnte nicht gelesen werden: {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("not a data URL")]
    NotADataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Wrap raw image bytes as a `data:<mime>;base64,...` URL
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Split a data URL into its mime type and decoded payload
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), CaptureError> {
    let rest = url.strip_prefix("data:").ok_or(CaptureError::NotADataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(CaptureError::NotADataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(CaptureError::NotADataUrl)?;
    Ok((mime.to_string(), BASE64.decode(payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_round_trip() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        let url = encode_data_url("image/jpeg", &bytes);
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let (mime, decoded) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_parse_rejects_plain_strings() {
        assert!(parse_data_url("not a url").is_err());
        assert!(parse_data_url("data:image/png,rawpayload").is_err());
    }
}
