//! Common types for the vector-store module.
//!
//! These types are shared by every [`VectorStore`](crate::VectorStore)
//! implementation and by the ingestion and search layers above them.

use lectern_content::DocumentMetadata;
use lectern_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default Mixedbread API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mixedbread.com";

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for the hosted vector store.
///
/// Both the credential and the store identifier are optional at load time;
/// callers decide whether their absence is fatal (ingestion) or degrades to
/// error responses (search gateway).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// API credential.
    pub api_key: Option<String>,

    /// Target vector-store identifier.
    pub vector_store_id: Option<String>,

    /// API base URL.
    pub base_url: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            vector_store_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl VectorStoreConfig {
    /// The API credential, or a configuration error if unset or empty.
    pub fn api_key(&self) -> Result<&str> {
        non_empty(self.api_key.as_deref())
            .ok_or_else(|| Error::config("vector store API key is not set"))
    }

    /// The vector-store identifier, or a configuration error if unset or empty.
    pub fn vector_store_id(&self) -> Result<&str> {
        non_empty(self.vector_store_id.as_deref())
            .ok_or_else(|| Error::config("vector store ID is not set"))
    }

    /// Whether both the credential and the store identifier are present.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok() && self.vector_store_id().is_ok()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Granularity at which the store is searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchGranularity {
    /// Search individual chunks; several hits may share a parent file.
    #[default]
    Chunk,
    /// Search whole files, each with a few representative chunks.
    File,
}

impl fmt::Display for SearchGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunk => f.write_str("chunk"),
            Self::File => f.write_str("file"),
        }
    }
}

impl FromStr for SearchGranularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chunk" => Ok(Self::Chunk),
            "file" => Ok(Self::File),
            other => Err(Error::config(format!(
                "unknown search granularity '{other}' (expected 'chunk' or 'file')"
            ))),
        }
    }
}

/// Search behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Chunk- or file-level search.
    pub granularity: SearchGranularity,

    /// Number of top matches requested from the store.
    pub top_k: usize,

    /// Representative chunks per file (file granularity only).
    pub chunks_per_file: usize,

    /// Input debounce for the docs search dialog, in milliseconds.
    pub delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            granularity: SearchGranularity::Chunk,
            top_k: 10,
            chunks_per_file: 3,
            delay_ms: 200,
        }
    }
}

// ============================================================================
// Search types
// ============================================================================

/// Parameters for a vector-store search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,

    /// Stores to search.
    pub vector_store_ids: Vec<String>,

    /// Maximum results to return.
    pub top_k: usize,

    /// Chunk- or file-level search.
    pub granularity: SearchGranularity,

    /// Representative chunks per file (file granularity only).
    pub chunks_per_file: usize,

    /// Ask the store to attach metadata to each hit.
    pub return_metadata: bool,
}

impl SearchRequest {
    /// Create a request against one store with default settings.
    pub fn new(query: impl Into<String>, vector_store_id: impl Into<String>) -> Self {
        Self::from_config(query, vector_store_id, &SearchConfig::default())
    }

    /// Create a request against one store using configured settings.
    pub fn from_config(
        query: impl Into<String>,
        vector_store_id: impl Into<String>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            query: query.into(),
            vector_store_ids: vec![vector_store_id.into()],
            top_k: config.top_k,
            granularity: config.granularity,
            chunks_per_file: config.chunks_per_file,
            return_metadata: true,
        }
    }

    /// Set the result limit.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the search granularity.
    pub fn with_granularity(mut self, granularity: SearchGranularity) -> Self {
        self.granularity = granularity;
        self
    }
}

/// One ranked hit returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Opaque identifier of the source file.
    pub file_id: String,

    /// Relevance score (not used for ordering; the store's order is kept).
    pub score: f64,

    /// Metadata attached to the source file.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// Representative chunk texts, best first. May be empty.
    #[serde(default)]
    pub chunks: Vec<String>,
}

impl SearchHit {
    /// Create a hit with no metadata.
    pub fn new(file_id: impl Into<String>, score: f64) -> Self {
        Self {
            file_id: file_id.into(),
            score,
            metadata: serde_json::Map::new(),
            chunks: Vec::new(),
        }
    }

    /// Add a metadata field.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Add a representative chunk.
    pub fn with_chunk(mut self, text: impl Into<String>) -> Self {
        self.chunks.push(text.into());
        self
    }

    /// A non-empty string metadata field.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Upload types
// ============================================================================

/// A file to attach to a vector store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Target store.
    pub vector_store_id: String,

    /// Name the file is stored under.
    pub file_name: String,

    /// Raw file bytes.
    pub content: Vec<u8>,

    /// MIME type sent with the bytes.
    pub mime_type: String,

    /// Metadata record stored with the file.
    pub metadata: DocumentMetadata,
}

impl UploadRequest {
    /// Create a `text/plain` upload.
    pub fn new(
        vector_store_id: impl Into<String>,
        file_name: impl Into<String>,
        content: Vec<u8>,
        metadata: DocumentMetadata,
    ) -> Self {
        Self {
            vector_store_id: vector_store_id.into(),
            file_name: file_name.into(),
            content,
            mime_type: "text/plain".to_string(),
            metadata,
        }
    }
}

/// Identifier returned for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Vector-store file identifier.
    pub id: String,

    /// Underlying stored-file identifier.
    pub file_id: String,

    /// Processing status reported by the store, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
