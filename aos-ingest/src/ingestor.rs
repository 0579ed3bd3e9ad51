//! Manifest-driven view ingestion
//!
//! One call is a single ordered pass over the manifest. Every pose block is
//! parsed before any image is decoded, so a malformed matrix aborts the call
//! with the target untouched. Entries whose image decodes empty are skipped.

use crate::decode::{FileDecoder, ImageDecoder};
use crate::light_field::ViewSink;
use crate::options::IngestOptions;
use crate::view::View;
use aos_data::{ManifestError, PoseManifest, Transform};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal ingestion errors. Missing or empty images are not errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Manifest unreadable: {0}")]
    ManifestUnreadable(#[source] ManifestError),

    #[error("Manifest malformed: {0}")]
    ManifestMalformed(#[source] ManifestError),
}

impl From<ManifestError> for IngestError {
    fn from(err: ManifestError) -> Self {
        if err.is_malformed() {
            IngestError::ManifestMalformed(err)
        } else {
            IngestError::ManifestUnreadable(err)
        }
    }
}

/// What happened to a single manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Inserted,
    SkippedEmptyImage,
}

/// An entry whose pose has been parsed and whose filename is resolved.
struct PendingEntry {
    transform: Transform,
    name: String,
    path: PathBuf,
}

/// Ingests pose manifests into a [`ViewSink`] using an [`ImageDecoder`].
#[derive(Debug, Clone, Default)]
pub struct ViewIngestor<D: ImageDecoder> {
    decoder: D,
}

impl<D: ImageDecoder> ViewIngestor<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Load the manifest at `manifest_path` and ingest it.
    ///
    /// Returns the number of views inserted into `target`.
    #[tracing::instrument(skip_all, fields(manifest = %manifest_path.as_ref().display()))]
    pub fn ingest<S, P>(
        &self,
        target: &mut S,
        manifest_path: P,
        options: &IngestOptions,
    ) -> Result<usize, IngestError>
    where
        S: ViewSink + ?Sized,
        P: AsRef<Path>,
    {
        let manifest = PoseManifest::from_path(manifest_path)?;
        self.ingest_manifest(target, &manifest, options)
    }

    /// Ingest an already loaded manifest.
    pub fn ingest_manifest<S>(
        &self,
        target: &mut S,
        manifest: &PoseManifest,
        options: &IngestOptions,
    ) -> Result<usize, IngestError>
    where
        S: ViewSink + ?Sized,
    {
        if manifest.is_empty() {
            info!("Manifest lists no images");
            return Ok(0);
        }
        if let Some(mask) = options.mask_path() {
            debug!("Mask file {} is not used during ingestion", mask.display());
        }

        let pending = resolve_entries(manifest, options)?;
        let images = self.decode_all(&pending);

        let mut inserted = 0;
        for (entry, image) in pending.into_iter().zip(images) {
            if insert_entry(target, entry, image) == EntryOutcome::Inserted {
                inserted += 1;
            }
        }

        let skipped = manifest.len() - inserted;
        if skipped > 0 {
            warn!("Ingested {} of {} views, {} skipped", inserted, manifest.len(), skipped);
        } else {
            info!("Ingested {} views", inserted);
        }
        Ok(inserted)
    }

    #[cfg(not(feature = "parallel"))]
    fn decode_all(&self, pending: &[PendingEntry]) -> Vec<Option<DynamicImage>> {
        pending.iter().map(|e| self.decoder.decode(&e.path)).collect()
    }

    // Decodes concurrently; results stay in manifest order for insertion.
    #[cfg(feature = "parallel")]
    fn decode_all(&self, pending: &[PendingEntry]) -> Vec<Option<DynamicImage>> {
        use rayon::prelude::*;
        pending.par_iter().map(|e| self.decoder.decode(&e.path)).collect()
    }
}

impl ViewIngestor<FileDecoder> {
    /// Ingestor reading images from disk with the `image` crate.
    pub fn from_files() -> Self {
        Self::new(FileDecoder)
    }
}

fn resolve_entries(
    manifest: &PoseManifest,
    options: &IngestOptions,
) -> Result<Vec<PendingEntry>, ManifestError> {
    let transforms = manifest.transforms()?;
    Ok(manifest
        .entries()
        .iter()
        .zip(transforms)
        .map(|(entry, transform)| {
            let name = options.resolve_name(entry.image_file()).into_owned();
            let path = options.image_path(&name);
            PendingEntry {
                transform,
                name,
                path,
            }
        })
        .collect())
}

fn insert_entry<S>(target: &mut S, entry: PendingEntry, image: Option<DynamicImage>) -> EntryOutcome
where
    S: ViewSink + ?Sized,
{
    match image {
        Some(image) => {
            debug!("Inserting view {} from {}", entry.name, entry.path.display());
            target.insert_view(View::new(image, entry.transform, entry.name));
            EntryOutcome::Inserted
        }
        None => {
            warn!("Skipping {}: image missing or empty", entry.path.display());
            EntryOutcome::SkippedEmptyImage
        }
    }
}

/// Ingest a manifest file into `target`, decoding images from disk.
///
/// An empty `mask_path` means no mask. With `extension_rewrite` set,
/// `.tiff` filenames are looked up as `.png`.
pub fn ingest<S>(
    target: &mut S,
    manifest_path: impl AsRef<Path>,
    image_root: impl Into<PathBuf>,
    mask_path: &str,
    extension_rewrite: bool,
) -> Result<usize, IngestError>
where
    S: ViewSink + ?Sized,
{
    let options = IngestOptions::new(image_root)
        .with_mask_path(mask_path)
        .with_extension_rewrite(extension_rewrite);
    ViewIngestor::from_files().ingest(target, manifest_path, &options)
}
