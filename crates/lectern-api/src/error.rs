//! Gateway error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Errors returned by the search gateway.
///
/// The rendered message is the exact `error` string sent to clients; the
/// underlying cause of an upstream failure is logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Store credentials or identifier missing.
    #[error("Environment setup failed")]
    Configuration,

    /// Empty or absent `query` parameter.
    #[error("Query is required")]
    MissingQuery,

    /// The vector store could not be reached or rejected the search.
    #[error("Search failed")]
    Upstream(#[source] lectern_core::Error),
}

/// Convenience type alias for gateway results.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingQuery => StatusCode::BAD_REQUEST,
            Self::Configuration | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(cause) => tracing::error!(error = %cause, "vector store search failed"),
            Self::Configuration => tracing::error!("vector store API key or ID not configured"),
            Self::MissingQuery => tracing::debug!("search request without query"),
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ApiError> for lectern_core::Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Configuration => {
                lectern_core::Error::config("vector store API key or ID is not set")
            }
            ApiError::MissingQuery => lectern_core::Error::invalid_data("query is required"),
            ApiError::Upstream(cause) => cause,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Configuration.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::MissingQuery.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Upstream(lectern_core::Error::api(502, "bad gateway")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_are_client_strings() {
        assert_eq!(ApiError::Configuration.to_string(), "Environment setup failed");
        assert_eq!(ApiError::MissingQuery.to_string(), "Query is required");
        let upstream = ApiError::Upstream(lectern_core::Error::api(401, "invalid api key"));
        assert_eq!(upstream.to_string(), "Search failed");
    }

    #[test]
    fn test_into_core_error() {
        let err: lectern_core::Error = ApiError::Configuration.into();
        assert!(err.is_config());

        let err: lectern_core::Error =
            ApiError::Upstream(lectern_core::Error::api(503, "down")).into();
        assert!(matches!(err, lectern_core::Error::Api { status: 503, .. }));
    }
}
