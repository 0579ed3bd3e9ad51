//! AOS Ingest Crate
//!
//! Turns a pose manifest plus a directory of images into an ordered
//! collection of views for light-field integration.
//!
//! ## Modules
//!
//! - [`decode`]: Image decode service boundary
//! - [`view`]: A decoded image paired with its pose
//! - [`light_field`]: Aggregation target trait and the in-memory collection
//! - [`options`]: Ingestion options and filename rewriting
//! - [`ingestor`]: The manifest-driven ingestion pass

pub mod decode;
pub mod ingestor;
pub mod light_field;
pub mod options;
pub mod view;

pub use decode::{FileDecoder, ImageDecoder};
pub use ingestor::{EntryOutcome, IngestError, ViewIngestor, ingest};
pub use light_field::{LightField, ViewSink};
pub use options::{ExtensionRewrite, IngestOptions};
pub use view::View;
