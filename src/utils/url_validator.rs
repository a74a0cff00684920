//! Target URL validation.
//!
//! Submitted URLs are stored byte-for-byte as received, so this module only
//! checks them and never rewrites them.

use url::Url;

/// Maximum accepted length of a target URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {max} bytes", max = MAX_URL_LENGTH)]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL contains a character not allowed in a redirect target: {0:?}")]
    InvalidCharacter(char),

    #[error("URL must not start or end with whitespace")]
    SurroundingWhitespace,
}

/// Checks that `input` is an absolute HTTP(S) URL suitable for redirection.
///
/// # Rules
///
/// 1. Not empty or whitespace-only
/// 2. At most [`MAX_URL_LENGTH`] bytes
/// 3. Parses as an absolute URL
/// 4. Scheme is `http` or `https`
/// 5. Has a host
/// 6. No surrounding whitespace, control characters or non-ASCII characters,
///    since the input is later sent verbatim in a `Location` header
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    // `Url::parse` strips these silently, so check the raw input first.
    if input.trim() != input {
        return Err(UrlValidationError::SurroundingWhitespace);
    }

    if let Some(c) = input.chars().find(|c| c.is_ascii_control() || !c.is_ascii()) {
        return Err(UrlValidationError::InvalidCharacter(c));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
