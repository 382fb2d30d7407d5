//! Error types for fyyur-web
//!
//! Handler errors render the HTML error pages rather than JSON.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::templates::{NotFoundTemplate, Page, ServerErrorTemplate};

/// Handler error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Page template failed to render (500)
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// fyyur-common error (500)
    #[error("Common error: {0}")]
    Common(#[from] fyyur_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, rendered) = match &self {
            ApiError::NotFound(what) => {
                tracing::debug!("404: {}", what);
                (
                    StatusCode::NOT_FOUND,
                    NotFoundTemplate { page: Page::home() }.render(),
                )
            }
            ApiError::Template(_) | ApiError::Common(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ServerErrorTemplate { page: Page::home() }.render(),
                )
            }
        };

        match rendered {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!("Failed to render error page: {}", e);
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Parse an id path segment; anything but an integer is a missing page
pub fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("invalid id: {raw}")))
}
