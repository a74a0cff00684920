//! DTOs for link shortening endpoint.

use crate::application::services::ShortLink;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL, sent as JSON or as an urlencoded form.
///
/// A missing `url` field deserializes to an empty string so that it is
/// reported by validation rather than as a body parsing error.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}

/// Successful shortening result.
///
/// `id` is the short code itself.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub id: String,
    pub short_url: String,
    pub long_url: String,
}

impl From<ShortLink> for ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.code,
            short_url: link.short_url,
            long_url: link.long_url,
        }
    }
}
