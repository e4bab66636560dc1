//! Mixedbread vector-store client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::store::VectorStore;
use crate::types::{
    SearchGranularity, SearchHit, SearchRequest, UploadRequest, UploadedFile, VectorStoreConfig,
};
use lectern_core::{Error, Result};

/// Vector store backed by the Mixedbread HTTP API.
pub struct MixedbreadStore {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl MixedbreadStore {
    /// Creates a new Mixedbread client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Mixedbread API key
    /// * `base_url` - API root (e.g., "https://api.mixedbread.com")
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from configuration; fails if no API key is set.
    pub fn from_config(config: &VectorStoreConfig) -> Result<Self> {
        Ok(Self::new(config.api_key()?, config.base_url.as_str()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(&self, path: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http_with_source(format!("Failed to call {path}"), e))?;

        parse_response(path, response).await
    }

    async fn search_chunks(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let body = serde_json::json!({
            "query": request.query,
            "vector_store_identifiers": request.vector_store_ids,
            "top_k": request.top_k,
            "search_options": {
                "return_metadata": request.return_metadata,
            },
        });

        let response: ListResponse<ScoredChunk> =
            self.post_json("/v1/vector_stores/search", &body).await?;

        Ok(response
            .data
            .into_iter()
            .map(|chunk| SearchHit {
                metadata: merge_metadata(chunk.generated_metadata, chunk.metadata),
                chunks: chunk.text.into_iter().collect(),
                file_id: chunk.file_id,
                score: chunk.score,
            })
            .collect())
    }

    async fn search_files(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let body = serde_json::json!({
            "query": request.query,
            "vector_store_identifiers": request.vector_store_ids,
            "top_k": request.top_k,
            "search_options": {
                "return_metadata": request.return_metadata,
                "return_chunks": true,
                "chunks_per_file": request.chunks_per_file,
            },
        });

        let response: ListResponse<ScoredFile> =
            self.post_json("/v1/vector_stores/files/search", &body).await?;

        Ok(response
            .data
            .into_iter()
            .map(|file| SearchHit {
                metadata: merge_metadata(file.generated_metadata, file.metadata),
                chunks: file.chunks.into_iter().filter_map(|c| c.text).collect(),
                file_id: file.id,
                score: file.score,
            })
            .collect())
    }
}

#[async_trait]
impl VectorStore for MixedbreadStore {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        log::debug!(
            "mixedbread search ({}): top_k={} stores={:?}",
            request.granularity,
            request.top_k,
            request.vector_store_ids
        );
        match request.granularity {
            SearchGranularity::Chunk => self.search_chunks(request).await,
            SearchGranularity::File => self.search_files(request).await,
        }
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        let part = reqwest::multipart::Part::bytes(request.content)
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| Error::http_with_source("Invalid upload MIME type", e))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/v1/files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::http_with_source("Failed to call /v1/files", e))?;
        let stored: FileObject = parse_response("/v1/files", response).await?;

        let path = format!("/v1/vector_stores/{}/files", request.vector_store_id);
        let body = serde_json::json!({
            "file_id": stored.id,
            "metadata": request.metadata,
        });
        let attached: VectorStoreFileObject = self.post_json(&path, &body).await?;

        Ok(UploadedFile {
            id: attached.id,
            file_id: stored.id,
            status: attached.status,
        })
    }

    fn name(&self) -> &str {
        "mixedbread"
    }
}

async fn parse_response<T: for<'de> Deserialize<'de>>(
    path: &str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(Error::api(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| Error::http_with_source(format!("Failed to parse {path} response"), e))
}

/// Store-generated metadata overlaid with user-supplied metadata.
fn merge_metadata(generated: Option<Value>, user: Option<Value>) -> Map<String, Value> {
    let mut merged = Map::new();
    for source in [generated, user].into_iter().flatten() {
        if let Value::Object(fields) = source {
            merged.extend(fields);
        }
    }
    merged
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct ScoredChunk {
    file_id: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    generated_metadata: Option<Value>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ScoredFile {
    id: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    generated_metadata: Option<Value>,
    #[serde(default)]
    chunks: Vec<ChunkText>,
}

#[derive(Deserialize)]
struct ChunkText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Deserialize)]
struct VectorStoreFileObject {
    id: String,
    #[serde(default)]
    status: Option<String>,
}
