//! Image decode service boundary

use image::{DynamicImage, GenericImageView};
use std::path::Path;
use tracing::debug;

/// Decodes an image file.
///
/// `None` is the empty-image marker: a missing file, unreadable data and a
/// zero-sized image are all reported the same way and never as an error.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Option<DynamicImage>;
}

/// Decoder backed by the `image` crate, reading from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl FileDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Option<DynamicImage> {
        let image = match image::open(path) {
            Ok(image) => image,
            Err(e) => {
                debug!("Could not decode {}: {}", path.display(), e);
                return None;
            }
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            debug!("Decoded empty image from {}", path.display());
            return None;
        }
        Some(image)
    }
}

impl<D: ImageDecoder + ?Sized> ImageDecoder for &D {
    fn decode(&self, path: &Path) -> Option<DynamicImage> {
        (**self).decode(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;

    #[test]
    fn test_decode_png_from_disk() {
        let dir = std::env::temp_dir().join(format!("aos-decode-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");
        RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let image = FileDecoder::new().decode(&path).unwrap();
        assert_eq!(image.dimensions(), (4, 3));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("aos-decode-missing/nothing.png");
        assert!(FileDecoder.decode(&path).is_none());
    }

    #[test]
    fn test_garbage_is_empty() {
        let dir = std::env::temp_dir().join(format!("aos-decode-garbage-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        assert!(FileDecoder.decode(&path).is_none());

        fs::remove_dir_all(&dir).ok();
    }
}
