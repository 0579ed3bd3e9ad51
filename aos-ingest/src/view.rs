//! Posed image views

use aos_data::{Transform, camera_position};
use glam::DVec3;
use image::{DynamicImage, GenericImageView};

/// A decoded image paired with its camera-to-world pose.
#[derive(Debug, Clone)]
pub struct View {
    image: DynamicImage,
    transform: Transform,
    name: String,
}

impl View {
    /// Create a new view
    pub fn new(image: DynamicImage, transform: Transform, name: impl Into<String>) -> Self {
        Self {
            image,
            transform,
            name: name.into(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get image dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Camera position taken from the inverse pose
    pub fn camera_position(&self) -> DVec3 {
        camera_position(&self.transform)
    }

    /// Split the view back into its parts
    pub fn into_parts(self) -> (DynamicImage, Transform, String) {
        (self.image, self.transform, self.name)
    }
}
