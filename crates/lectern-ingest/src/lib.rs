//! Markdown ingestion for Lectern.
//!
//! Walks a content directory, parses each file's frontmatter into a flat
//! metadata record and uploads the raw file together with that record to a
//! [`VectorStore`](lectern_vector::VectorStore).
//!
//! ```rust,ignore
//! use lectern_ingest::{preflight, IngestOptions, Ingestor};
//!
//! let store_id = preflight(&config, Path::new("content"))?;
//! let store = MixedbreadStore::from_config(&config)?;
//! let report = Ingestor::new(store, store_id, IngestOptions::new("content")).run().await?;
//! println!("{} uploaded, {} failed", report.uploaded, report.failed());
//! ```

pub mod driver;
pub mod manifest;

pub use driver::{preflight, IngestFailure, IngestOptions, IngestReport, Ingestor};
pub use manifest::{content_hash, ManifestEntry, UploadManifest};
