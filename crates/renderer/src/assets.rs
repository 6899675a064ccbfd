//! Best-effort loading of optional image resources.

use image::RgbaImage;
use std::path::Path;

/// Load an image from disk as RGBA.
///
/// A missing or undecodable file is not an error: it is logged at debug and
/// the caller draws its fallback.
pub fn load_image(path: &Path) -> Option<RgbaImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Asset not readable");
            return None;
        }
    };

    match image::load_from_memory(&bytes) {
        Ok(img) => {
            let img = img.to_rgba8();
            if img.width() == 0 || img.height() == 0 {
                tracing::debug!(path = %path.display(), "Asset is empty");
                return None;
            }
            Some(img)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Asset not decodable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        assert!(load_image(Path::new("/nonexistent/background.png")).is_none());
    }

    #[test]
    fn test_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(load_image(&path).is_none());
    }

    #[test]
    fn test_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]))
            .save(&path)
            .unwrap();
        let img = load_image(&path).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, [9, 8, 7, 255]);
    }
}
