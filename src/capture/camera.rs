//! Camera/file capture: pick an image file, deliver it as a data URL

use std::path::{Path, PathBuf};

use super::{encode_data_url, CaptureError};

/// Wraps the photo-capture flow: a best-effort device probe followed by a
/// file selection from the captures directory.
///
/// No validation of image dimensions or size is performed.
pub struct CameraCapture {
    captures_dir: PathBuf,
    /// Inline hint shown when no capture device was found; the file
    /// selection proceeds regardless.
    pub device_hint: Option<String>,
}

impl CameraCapture {
    pub fn new(captures_dir: PathBuf) -> Self {
        Self {
            captures_dir,
            device_hint: None,
        }
    }

    /// Probe for a capture device as a side effect of activation.
    /// Failure only records a hint, it never blocks the file picker.
    pub fn activate(&mut self) {
        match probe_capture_device() {
            Some(device) => {
                tracing::debug!(device = %device.display(), "Capture device present");
                self.device_hint = None;
            }
            None => {
                tracing::info!("No capture device found, falling back to file selection");
                self.device_hint =
                    Some("Keine Kamera gefunden – Datei aus dem Aufnahmeordner wählen".to_string());
            }
        }
    }

    /// Image files available for selection, newest first
    pub fn list_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.captures_dir) else {
            return Vec::new();
        };
        let mut files: Vec<(std::time::SystemTime, PathBuf)> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_image_file(p))
            .map(|p| {
                let modified = p
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                (modified, p)
            })
            .collect();
        files.sort_by(|a, b| b.0.cmp(&a.0));
        files.into_iter().map(|(_, p)| p).collect()
    }

    /// Read the chosen file and return it as a base64 data URL
    pub fn capture_file(&self, path: &Path) -> Result<String, CaptureError> {
        let bytes = std::fs::read(path).map_err(|source| CaptureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let format = image::guess_format(&bytes).map_err(|_| CaptureError::UnknownFormat)?;
        Ok(encode_data_url(format.to_mime_type(), &bytes))
    }
}

fn is_image_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
        Some(ref ext) if ["jpg", "jpeg", "png", "gif", "webp", "bmp"].contains(&ext.as_str())
    )
}

/// Look for a video capture device. Linux only; elsewhere the probe
/// always reports absence and the file picker carries the flow.
fn probe_capture_device() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        for index in 0..4 {
            let device = PathBuf::from(format!("/dev/video{index}"));
            if device.exists() {
                return Some(device);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::parse_data_url;
    use tempfile::tempdir;

    // Smallest valid 1x1 PNG
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_capture_file_returns_png_data_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, TINY_PNG).unwrap();

        let camera = CameraCapture::new(dir.path().to_path_buf());
        let url = camera.capture_file(&path).unwrap();

        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, TINY_PNG);
    }

    #[test]
    fn test_capture_missing_file_errors() {
        let dir = tempdir().unwrap();
        let camera = CameraCapture::new(dir.path().to_path_buf());
        assert!(camera.capture_file(&dir.path().join("absent.jpg")).is_err());
    }

    #[test]
    fn test_list_files_filters_non_images() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), TINY_PNG).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let camera = CameraCapture::new(dir.path().to_path_buf());
        let files = camera.list_files();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.png"));
    }
}
