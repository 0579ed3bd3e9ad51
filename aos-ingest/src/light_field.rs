//! Aggregation targets for ingested views

use crate::view::View;
use aos_data::Transform;
use glam::DVec3;

/// Append-only, order-preserving sink for views.
pub trait ViewSink {
    /// Append a view; the sink takes ownership.
    fn insert_view(&mut self, view: View);

    /// Number of views held.
    fn view_count(&self) -> usize;
}

/// In-memory light field: views in insertion order.
#[derive(Debug, Default)]
pub struct LightField {
    views: Vec<View>,
}

impl LightField {
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            views: Vec::with_capacity(capacity),
        }
    }

    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    pub fn pose(&self, index: usize) -> Option<&Transform> {
        self.views.get(index).map(View::transform)
    }

    pub fn camera_position(&self, index: usize) -> Option<DVec3> {
        self.views.get(index).map(View::camera_position)
    }

    /// Names of all views, in order
    pub fn camera_names(&self) -> Vec<&str> {
        self.views.iter().map(View::name).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, View> {
        self.views.iter()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ViewSink for LightField {
    fn insert_view(&mut self, view: View) {
        self.views.push(view);
    }

    fn view_count(&self) -> usize {
        self.views.len()
    }
}

impl<'a> IntoIterator for &'a LightField {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

impl ViewSink for Vec<View> {
    fn insert_view(&mut self, view: View) {
        self.push(view);
    }

    fn view_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DMat4;
    use image::{DynamicImage, RgbImage};

    fn view(name: &str, offset: f64) -> View {
        let image = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        View::new(image, DMat4::from_translation(DVec3::new(offset, 0.0, 0.0)), name)
    }

    #[test]
    fn test_insertion_order() {
        let mut lf = LightField::new();
        assert!(lf.is_empty());
        lf.insert_view(view("a", 1.0));
        lf.insert_view(view("b", 2.0));

        assert_eq!(lf.view_count(), 2);
        assert_eq!(lf.camera_names(), ["a", "b"]);
        assert_eq!(lf.pose(1).unwrap().w_axis.x, 2.0);
        assert!(lf.view(2).is_none());
    }

    #[test]
    fn test_camera_position() {
        let mut lf = LightField::with_capacity(1);
        lf.insert_view(view("a", 3.0));
        assert_eq!(lf.camera_position(0), Some(DVec3::new(-3.0, 0.0, 0.0)));
        assert_eq!(lf.iter().count(), 1);
    }
}
