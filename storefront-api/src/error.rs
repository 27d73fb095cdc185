//! API error mapping
//!
//! Maps the access and directory error taxonomies onto HTTP responses.
//! Authorization failures carry their reason code; nothing in a response
//! distinguishes a missing resource from one living in another tenant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use storefront_access::AccessError;
use storefront_tenancy::DirectoryError;

/// Error type returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An access-layer failure with a stable reason code.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        let access = match err {
            DirectoryError::Taken => AccessError::SlugOrSubdomainTaken,
            DirectoryError::NotFound => AccessError::NotFound,
            DirectoryError::StorageTimeout => AccessError::StorageTimeout,
            DirectoryError::Backend(message) => AccessError::Storage(message),
        };
        ApiError::Access(access)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Access(err) = self;
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_mapping() {
        let err: ApiError = DirectoryError::Taken.into();
        let ApiError::Access(access) = err;
        assert_eq!(access, AccessError::SlugOrSubdomainTaken);
    }
}
