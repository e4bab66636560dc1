//! Shared, read-only gateway state.

use std::sync::Arc;

use lectern_vector::{SearchConfig, SearchRequest, VectorStore};

use crate::error::{ApiError, ApiResult};
use crate::results::{dedup_by_file, to_ui_items, UiResultItem};

/// Everything a search request needs.
///
/// The store and its identifier are optional so the gateway can start
/// without credentials and answer every search with a configuration error.
#[derive(Clone, Default)]
pub struct GatewayState {
    store: Option<Arc<dyn VectorStore>>,
    vector_store_id: Option<String>,
    search: SearchConfig,
}

impl GatewayState {
    /// State with no store configured.
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search,
            ..Self::default()
        }
    }

    /// Attach a store client.
    pub fn with_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the store identifier; empty strings count as unset.
    pub fn with_vector_store_id(mut self, id: impl Into<String>) -> Self {
        self.vector_store_id = Some(id.into()).filter(|id: &String| !id.is_empty());
        self
    }

    /// Search settings.
    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Whether searches can reach a store.
    pub fn is_configured(&self) -> bool {
        self.store.is_some() && self.vector_store_id.is_some()
    }

    /// Run the search pipeline for one query.
    ///
    /// Configuration is checked before the query.
    pub async fn search(&self, query: Option<&str>) -> ApiResult<Vec<UiResultItem>> {
        let (Some(store), Some(vector_store_id)) = (&self.store, &self.vector_store_id) else {
            return Err(ApiError::Configuration);
        };
        let query = query.filter(|q| !q.is_empty()).ok_or(ApiError::MissingQuery)?;

        let request = SearchRequest::from_config(query, vector_store_id.as_str(), &self.search);
        tracing::debug!(
            store = store.name(),
            granularity = %request.granularity,
            top_k = request.top_k,
            "searching"
        );

        let hits = store.search(&request).await.map_err(ApiError::Upstream)?;
        let total = hits.len();
        let unique = dedup_by_file(hits);
        tracing::info!(query, hits = total, files = unique.len(), "search complete");

        Ok(to_ui_items(&unique))
    }
}
