//! Batch ingestion of a content tree into a vector store.
//!
//! Files are processed one at a time, in path order. A failure on one file
//! is logged and recorded in the report; the batch continues with the next
//! file. A run aborts only when a precondition fails (missing credentials,
//! missing content directory, unreadable manifest) or when the manifest
//! cannot be saved after an upload.

use std::path::{Path, PathBuf};

use lectern_content::{parse_frontmatter, DocumentMetadata};
use lectern_core::util::files::{self, FileInfo, FindOptions, DEFAULT_EXCLUDED_DIRS};
use lectern_core::{Error, Result};
use lectern_vector::{UploadRequest, UploadedFile, VectorStore, VectorStoreConfig};

use crate::manifest::{content_hash, UploadManifest};

/// Options controlling one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Root of the markdown tree.
    pub content_root: PathBuf,

    /// Directory names pruned during discovery.
    pub exclude_dirs: Vec<String>,

    /// Upload manifest; `None` uploads every file on every run.
    pub manifest_path: Option<PathBuf>,

    /// Ignore recorded hashes and upload everything.
    pub force: bool,
}

impl IngestOptions {
    /// Options for `content_root` with default exclusions and no manifest.
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            manifest_path: None,
            force: false,
        }
    }

    /// Replace the excluded directory names.
    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Track uploads in a manifest at `path`.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Upload even files the manifest says are unchanged.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// A file that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
    /// Path of the file.
    pub path: PathBuf,
    /// Rendered error.
    pub error: String,
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Markdown files found.
    pub discovered: usize,
    /// Files uploaded.
    pub uploaded: usize,
    /// Files skipped as unchanged.
    pub skipped: usize,
    /// Files that failed.
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Uploaded files as a percentage of attempted files.
    ///
    /// A run that attempted nothing reports 100.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.discovered.saturating_sub(self.skipped);
        if attempted == 0 {
            return 100.0;
        }
        self.uploaded as f64 / attempted as f64 * 100.0
    }
}

/// Check that an ingestion run can start.
///
/// Returns the target store identifier.
pub fn preflight<'a>(config: &'a VectorStoreConfig, content_root: &Path) -> Result<&'a str> {
    config.api_key()?;
    let vector_store_id = config.vector_store_id()?;
    if !content_root.is_dir() {
        return Err(Error::config(format!(
            "content directory not found: {}",
            content_root.display()
        )));
    }
    Ok(vector_store_id)
}

/// Uploads a content tree to a vector store.
pub struct Ingestor<S: VectorStore> {
    store: S,
    vector_store_id: String,
    options: IngestOptions,
}

/// A file read and parsed, ready for upload.
struct PreparedFile {
    key: String,
    hash: String,
    request: UploadRequest,
}

impl<S: VectorStore> Ingestor<S> {
    /// Create an ingestor targeting `vector_store_id`.
    pub fn new(store: S, vector_store_id: impl Into<String>, options: IngestOptions) -> Self {
        Self {
            store,
            vector_store_id: vector_store_id.into(),
            options,
        }
    }

    /// Run options.
    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Discover, parse and upload every markdown file under the content root.
    pub async fn run(&self) -> Result<IngestReport> {
        let root = &self.options.content_root;
        if !files::is_dir(root).await {
            return Err(Error::config(format!(
                "content directory not found: {}",
                root.display()
            )));
        }

        let mut manifest = match &self.options.manifest_path {
            Some(path) => Some(UploadManifest::load(path)?),
            None => None,
        };

        let find =
            FindOptions::markdown().with_exclude_dirs(self.options.exclude_dirs.iter().cloned());
        let found = files::find_all_files(root, find).await?;

        let total = found.len();
        log::info!("Found {total} markdown files to upload");

        let mut report = IngestReport {
            discovered: total,
            ..IngestReport::default()
        };

        for (i, file) in found.iter().enumerate() {
            log::info!("[{}/{}] Processing: {}", i + 1, total, file.path.display());

            let prepared = match self.prepare(file).await {
                Ok(prepared) => prepared,
                Err(e) => {
                    record_failure(&mut report, file, &e);
                    continue;
                }
            };

            let unchanged = manifest.as_ref().is_some_and(|m| {
                m.is_current(&self.vector_store_id, &prepared.key, &prepared.hash)
            });
            if unchanged && !self.options.force {
                log::info!("Unchanged, skipping: {}", file.file_name);
                report.skipped += 1;
                continue;
            }

            match self.upload(prepared.request).await {
                Ok(uploaded) => {
                    log::info!("Uploaded: {} - ID: {}", file.file_name, uploaded.id);
                    report.uploaded += 1;
                    if let (Some(manifest), Some(path)) =
                        (manifest.as_mut(), self.options.manifest_path.as_deref())
                    {
                        manifest.record(
                            self.vector_store_id.as_str(),
                            prepared.key,
                            prepared.hash,
                            uploaded.id,
                        );
                        if let Err(e) = manifest.save(path) {
                            log::error!("Failed to save upload manifest, stopping: {e}");
                            return Err(e);
                        }
                    }
                }
                Err(e) => record_failure(&mut report, file, &e),
            }
        }

        log::info!(
            "Upload complete: {}/{} files uploaded successfully ({:.1}%), {} skipped, {} failed",
            report.uploaded,
            total,
            report.success_rate(),
            report.skipped,
            report.failed()
        );

        Ok(report)
    }

    async fn prepare(&self, file: &FileInfo) -> Result<PreparedFile> {
        let bytes = files::read_bytes(&file.path).await?;
        let text = std::str::from_utf8(&bytes).map_err(|e| {
            Error::invalid_data(format!("{} is not valid UTF-8: {e}", file.path.display()))
        })?;

        let parsed = parse_frontmatter(text);
        let key = file.path.display().to_string();
        let metadata = DocumentMetadata::for_file(
            parsed.frontmatter,
            key.clone(),
            file.file_name.clone(),
            text,
        );
        log::debug!("{}: {} metadata fields", file.file_name, metadata.len());

        let hash = content_hash(&bytes);
        let request = UploadRequest::new(&self.vector_store_id, &file.file_name, bytes, metadata);
        Ok(PreparedFile { key, hash, request })
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        log::debug!("Uploading {} to {}", request.file_name, self.store.name());
        self.store.upload(request).await
    }
}

fn record_failure(report: &mut IngestReport, file: &FileInfo, error: &Error) {
    log::error!("Failed to process {}: {}", file.path.display(), error);
    report.failures.push(IngestFailure {
        path: file.path.clone(),
        error: error.to_string(),
    });
}
