//! Upload manifest for skipping unchanged files.
//!
//! The vector store assigns a fresh identifier to every upload, so running
//! ingestion twice duplicates every file remotely. The manifest remembers
//! the content hash each file had when it was last uploaded, and the store
//! it went to. A file whose hash has not changed since its last upload to
//! the same store is skipped.

use chrono::{DateTime, Utc};
use lectern_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Record of one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Vector store the file was uploaded to. Empty in manifests written
    /// before stores were recorded, which never match.
    #[serde(default)]
    pub vector_store_id: String,

    /// blake3 hash of the file bytes at upload time.
    pub content_hash: String,

    /// Identifier the store returned.
    pub file_id: String,

    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

/// Uploaded files keyed by their `file_path` metadata value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadManifest {
    /// Entries by file path.
    pub files: BTreeMap<String, ManifestEntry>,
}

/// Compute the content hash used in the manifest.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

impl UploadManifest {
    /// Load a manifest; a missing file yields an empty manifest.
    ///
    /// An unreadable or malformed file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        serde_json::from_str(&json).map_err(|e| {
            Error::config(format!("corrupt upload manifest {}: {e}", path.display()))
        })
    }

    /// Write the manifest, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;
        Ok(())
    }

    /// Whether `file_path` was uploaded to `vector_store_id` with exactly
    /// this content.
    pub fn is_current(&self, vector_store_id: &str, file_path: &str, hash: &str) -> bool {
        self.files.get(file_path).is_some_and(|entry| {
            entry.vector_store_id == vector_store_id && entry.content_hash == hash
        })
    }

    /// Record a successful upload, replacing any entry for the same path.
    pub fn record(
        &mut self,
        vector_store_id: impl Into<String>,
        file_path: impl Into<String>,
        hash: impl Into<String>,
        file_id: impl Into<String>,
    ) {
        self.files.insert(
            file_path.into(),
            ManifestEntry {
                vector_store_id: vector_store_id.into(),
                content_hash: hash.into(),
                file_id: file_id.into(),
                uploaded_at: Utc::now(),
            },
        );
    }

    /// Number of recorded files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
