//! Pose manifest loading.
//!
//! A manifest is a JSON document with an `images` array; each entry holds a
//! 3x4 pose block under `M3x4` and an image filename under `imagefile`.

use crate::pose::{Transform, TransformError, parse_transform};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading or interpreting a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read manifest {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("malformed pose for entry {index} ({image_file}): {source}")]
    Matrix {
        index: usize,
        image_file: String,
        #[source]
        source: TransformError,
    },
}

impl ManifestError {
    /// True for structural problems, false for I/O failures.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ManifestError::Unreadable { .. })
    }
}

/// One image entry of a pose manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "M3x4")]
    matrix: JsonValue,
    #[serde(rename = "imagefile")]
    image_file: String,
}

impl ManifestEntry {
    pub fn new(matrix: JsonValue, image_file: impl Into<String>) -> Self {
        Self {
            matrix,
            image_file: image_file.into(),
        }
    }

    /// Raw pose block as stored in the manifest.
    pub fn matrix(&self) -> &JsonValue {
        &self.matrix
    }

    /// Image filename relative to the image root.
    pub fn image_file(&self) -> &str {
        &self.image_file
    }

    /// Parse this entry's pose block.
    pub fn transform(&self) -> Result<Transform, TransformError> {
        parse_transform(&self.matrix)
    }
}

/// Ordered list of manifest entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoseManifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    images: Vec<ManifestEntry>,
}

// `"images": null` counts as no entries, like a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ManifestEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ManifestEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PoseManifest {
    pub fn new(images: Vec<ManifestEntry>) -> Self {
        Self { images }
    }

    /// Load a manifest from disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        debug!("Loading pose manifest");
        let bytes = fs::read(path).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_slice(&bytes)?;
        info!("Pose manifest loaded: {} entries", manifest.len());
        Ok(manifest)
    }

    /// Load a manifest from any reader. Read failures are reported against `<reader>`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ManifestError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| ManifestError::Unreadable {
                path: PathBuf::from("<reader>"),
                source,
            })?;
        Self::from_slice(&bytes)
    }

    /// Parse a manifest from raw JSON bytes. Invalid UTF-8 is a malformed manifest.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Parse every pose in manifest order, failing on the first bad block.
    pub fn transforms(&self) -> Result<Vec<Transform>, ManifestError> {
        self.images
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry.transform().map_err(|source| ManifestError::Matrix {
                    index,
                    image_file: entry.image_file.clone(),
                    source,
                })
            })
            .collect()
    }
}

impl FromStr for PoseManifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    const TWO_ENTRIES: &str = r#"{
        "images": [
            { "M3x4": [[1,0,0,10],[0,1,0,20],[0,0,1,30]], "imagefile": "v0.png", "extra": 1 },
            { "M3x4": [["1","0","0","-1.5"],["0","1","0","0"],["0","0","1","2"]], "imagefile": "v1.tiff" }
        ]
    }"#;

    #[test]
    fn test_parse_entries_in_order() {
        let manifest: PoseManifest = TWO_ENTRIES.parse().unwrap();
        assert_eq!(manifest.len(), 2);
        let names: Vec<_> = manifest.entries().iter().map(|e| e.image_file()).collect();
        assert_eq!(names, ["v0.png", "v1.tiff"]);

        let transforms = manifest.transforms().unwrap();
        assert_eq!(crate::translation(&transforms[0]), DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(crate::translation(&transforms[1]), DVec3::new(-1.5, 0.0, 2.0));
    }

    #[test]
    fn test_empty_and_missing_images() {
        let empty: PoseManifest = r#"{ "images": [] }"#.parse().unwrap();
        assert!(empty.is_empty());

        let missing: PoseManifest = r#"{ "other": 3 }"#.parse().unwrap();
        assert!(missing.is_empty());

        let null: PoseManifest = r#"{ "images": null }"#.parse().unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_structural_errors() {
        for text in [
            "[1, 2, 3]",
            r#"{ "images": 5 }"#,
            r#"{ "images": [ { "M3x4": [] } ] }"#,
            r#"{ "images": [ { "imagefile": "a.png" } ] }"#,
            r#"{ "images": [ { "M3x4": [], "imagefile": 7 } ] }"#,
            "{ not json",
        ] {
            let err = text.parse::<PoseManifest>().unwrap_err();
            assert!(matches!(err, ManifestError::Malformed(_)), "{text}");
            assert!(err.is_malformed());
        }
    }

    #[test]
    fn test_bad_matrix_reports_entry() {
        let manifest: PoseManifest = r#"{ "images": [
            { "M3x4": [[1,0,0,0],[0,1,0,0],[0,0,1,0]], "imagefile": "ok.png" },
            { "M3x4": [[1,0,0,0],[0,1,0],[0,0,1,0]], "imagefile": "bad.png" }
        ] }"#
            .parse()
            .unwrap();

        match manifest.transforms() {
            Err(ManifestError::Matrix {
                index,
                image_file,
                source,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(image_file, "bad.png");
                assert_eq!(source, TransformError::MalformedColumns { row: 1, columns: 3 });
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let path = std::env::temp_dir().join("aos-data-no-such-manifest.json");
        let err = PoseManifest::from_path(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Unreadable { .. }));
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let dir = std::env::temp_dir().join(format!("aos-data-utf8-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("poses.json");
        fs::write(&path, b"{ \"images\": [ \xff\xfe ] }").unwrap();

        let err = PoseManifest::from_path(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed(_)), "{err:?}");

        let err = PoseManifest::from_reader(&b"{ \"images\": [ \xff ] }"[..]).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed(_)), "{err:?}");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_path_and_reader() {
        let dir = std::env::temp_dir().join(format!("aos-data-manifest-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("poses.json");
        fs::write(&path, TWO_ENTRIES).unwrap();

        let from_path = PoseManifest::from_path(&path).unwrap();
        let from_reader = PoseManifest::from_reader(TWO_ENTRIES.as_bytes()).unwrap();
        assert_eq!(from_path.len(), from_reader.len());

        fs::remove_dir_all(&dir).ok();
    }
}
