//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 if the store cannot be reached.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let long_url = state.shortener.resolve(&code).await?;

    debug!(code = %code, "Redirecting");

    Ok(Redirect::temporary(&long_url))
}

/// Rejects a request for the bare root path.
///
/// # Endpoint
///
/// `GET /`
pub async fn missing_code_handler() -> AppError {
    AppError::bad_request("Short path not provided", json!({}))
}
