//! Search gateway for Lectern.
//!
//! Serves the docs UI search dialog:
//!
//! - `GET /api/vector-store?query=...` searches the vector store, keeps one
//!   hit per source file and returns a flat list of page and text items.
//! - `GET /api/search-dialog` returns the dialog binding (API path and
//!   debounce delay).
//!
//! Errors are JSON objects of the form `{"error": "..."}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub mod dialog;
pub mod error;
pub mod results;
pub mod state;

pub use dialog::{SearchDialogConfig, SEARCH_API_PATH};
pub use error::{ApiError, ApiResult};
pub use results::{dedup_by_file, to_ui_items, ResultType, UiResultItem};
pub use state::GatewayState;

/// Path of the dialog binding endpoint.
pub const DIALOG_PATH: &str = "/api/search-dialog";

/// Name of the search query parameter.
const QUERY_PARAM: &str = "query";

/// First value of `name`; repeated parameters are not an error.
fn first_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

async fn search_handler(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<UiResultItem>>> {
    let items = state.search(first_param(&params, QUERY_PARAM)).await?;
    Ok(Json(items))
}

async fn dialog_handler(State(state): State<Arc<GatewayState>>) -> Json<SearchDialogConfig> {
    Json(SearchDialogConfig::new(state.search_config().delay_ms))
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(SEARCH_API_PATH, get(search_handler))
        .route(DIALOG_PATH, get(dialog_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve the gateway until Ctrl-C.
pub async fn serve(state: GatewayState, addr: SocketAddr) -> lectern_core::Result<()> {
    if !state.is_configured() {
        tracing::warn!("vector store is not configured; searches will fail");
    }
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "search gateway listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("search gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
