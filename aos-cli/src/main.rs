//! AOS Inspect
//!
//! Loads a pose manifest, ingests its images into an in-memory light field
//! and prints the resulting views.

use aos_ingest::{IngestOptions, LightField, ViewIngestor};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Ingest a pose manifest and list the resulting views
#[derive(Parser, Debug)]
#[command(name = "aos-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON pose manifest
    manifest: PathBuf,

    /// Directory the manifest's image filenames are relative to
    image_root: PathBuf,

    /// Mask file, forwarded to the ingestion options
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Look up `.tiff` filenames as `.png`
    #[arg(long)]
    rewrite_ext: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Logging configuration.
struct LoggingConfig {
    level: String,
}

impl LoggingConfig {
    fn init(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.level)),
            )
            .with_target(false)
            .init();
    }
}

fn run(args: Args) -> Result<(), aos_ingest::IngestError> {
    let mut options = IngestOptions::new(&args.image_root).with_extension_rewrite(args.rewrite_ext);
    if let Some(mask) = &args.mask {
        options = options.with_mask_path(mask);
    }

    info!("Ingesting {} from {}", args.manifest.display(), args.image_root.display());
    let mut light_field = LightField::new();
    let count = ViewIngestor::from_files().ingest(&mut light_field, &args.manifest, &options)?;

    for (index, view) in light_field.iter().enumerate() {
        let (width, height) = view.dimensions();
        let position = view.camera_position();
        println!(
            "{index:4}  {:<32} {width}x{height}  position [{:.3}, {:.3}, {:.3}]",
            view.name(),
            position.x,
            position.y,
            position.z
        );
    }
    println!("{count} views ingested");
    Ok(())
}

fn main() {
    let args = Args::parse();
    LoggingConfig {
        level: args.log_level.clone(),
    }
    .init();

    if let Err(e) = run(args) {
        eprintln!("aos-inspect error: {}", e);
        std::process::exit(1);
    }
}
