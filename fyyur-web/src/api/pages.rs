//! Home page and the not-found fallback

use axum::{http::Uri, response::Response};

use crate::error::{ApiError, ApiResult};
use crate::flash::IncomingFlash;
use crate::templates::{render, HomeTemplate, Page, Section};

/// GET /
pub async fn index(flash: IncomingFlash) -> ApiResult<Response> {
    let page = Page::with_flash(Section::Venues, &flash);
    render(&HomeTemplate { page }, &flash)
}

/// Any unmatched route
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
