//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::JsonOrForm;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// JSON:
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// or form: `url=https%3A%2F%2Fexample.com`
///
/// # Response
///
/// ```json
/// {
///   "id": "8xTq3bYp2Kd",
///   "short_url": "http://localhost:8000/8xTq3bYp2Kd",
///   "long_url": "https://example.com"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is unreadable or the URL is missing or invalid
/// - 500 if the store is unavailable or no free code was found
pub async fn shorten_handler(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state.shortener.shorten(&payload.url).await?;

    Ok(Json(link.into()))
}
