//! AOS Data Crate
//!
//! Pose manifest loading and camera transform parsing.
//! This crate does no image I/O; it only turns a manifest file into
//! ordered entries with canonical camera-to-world transforms.

pub mod manifest;
pub mod pose;

pub use manifest::{ManifestEntry, ManifestError, PoseManifest};
pub use pose::{MatrixCell, Transform, TransformError, camera_position, parse_transform, translation};
