//! Mock vector store for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::VectorStore;
use crate::types::{SearchHit, SearchRequest, UploadRequest, UploadedFile};
use lectern_content::metadata::TEXT_KEY;
use lectern_core::{Error, Result};

/// In-memory vector store that records every call.
///
/// Searches return the canned hits when set; otherwise every uploaded file
/// is returned as a hit, in upload order, carrying the metadata it was
/// uploaded with. Either way the result is cut to the request's `top_k`.
#[derive(Clone, Default)]
pub struct MockVectorStore {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    canned: Option<Vec<SearchHit>>,
    failing_files: HashSet<String>,
    fail_search: bool,
    uploads: Vec<RecordedUpload>,
    searches: Vec<SearchRequest>,
}

/// An upload accepted by [`MockVectorStore`].
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    /// The request as received.
    pub request: UploadRequest,
    /// The identifiers handed back.
    pub uploaded: UploadedFile,
}

impl MockVectorStore {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store that answers every search with `hits`.
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                canned: Some(hits),
                ..MockState::default()
            })),
        }
    }

    /// Make uploads of the named file fail.
    pub async fn fail_upload_of(&self, file_name: impl Into<String>) {
        self.state.lock().await.failing_files.insert(file_name.into());
    }

    /// Make every search fail.
    pub async fn fail_searches(&self) {
        self.state.lock().await.fail_search = true;
    }

    /// Uploads accepted so far.
    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().await.uploads.clone()
    }

    /// Search requests received so far.
    pub async fn searches(&self) -> Vec<SearchRequest> {
        self.state.lock().await.searches.clone()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let mut state = self.state.lock().await;
        state.searches.push(request.clone());

        if state.fail_search {
            return Err(Error::api(503, "search unavailable"));
        }

        let mut hits = match &state.canned {
            Some(hits) => hits.clone(),
            None => state
                .uploads
                .iter()
                .enumerate()
                .map(|(i, upload)| hit_for_upload(i, upload))
                .collect(),
        };
        hits.truncate(request.top_k);
        Ok(hits)
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        let mut state = self.state.lock().await;

        if state.failing_files.contains(&request.file_name) {
            return Err(Error::api(
                500,
                format!("upload rejected: {}", request.file_name),
            ));
        }

        let n = state.uploads.len() + 1;
        let uploaded = UploadedFile {
            id: format!("vsf_{n}"),
            file_id: format!("file_{n}"),
            status: Some("completed".to_string()),
        };
        state.uploads.push(RecordedUpload {
            request,
            uploaded: uploaded.clone(),
        });
        Ok(uploaded)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn hit_for_upload(rank: usize, upload: &RecordedUpload) -> SearchHit {
    let mut metadata = upload.request.metadata.to_json();
    let chunk = metadata
        .remove(TEXT_KEY)
        .and_then(|v| v.as_str().map(String::from));

    SearchHit {
        file_id: upload.uploaded.file_id.clone(),
        score: 1.0 / (rank as f64 + 1.0),
        metadata,
        chunks: chunk.into_iter().collect(),
    }
}
