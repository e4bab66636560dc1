//! Vector-store abstraction.

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{SearchHit, SearchRequest, UploadRequest, UploadedFile};
use lectern_core::Result;

/// Abstraction over hosted vector stores.
///
/// Embedding, indexing and ranking all happen behind this trait; callers
/// only submit files and queries. Hits are returned in the store's rank
/// order.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search one or more stores.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;

    /// Attach one file, with metadata, to a store.
    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile>;

    /// Returns the name of this backend for logging.
    fn name(&self) -> &str {
        "unnamed"
    }
}

#[async_trait]
impl<T: VectorStore + ?Sized> VectorStore for Arc<T> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        (**self).search(request).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        (**self).upload(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
