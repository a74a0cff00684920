//! Short link creation and resolution service.

use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Default bound on generate-and-reserve attempts per shorten call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Codes that cannot be handed out because they shadow routed paths.
pub const RESERVED_CODES: &[&str] = &["shorten", "health"];

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
}

/// Service for creating and resolving short links.
///
/// Owns the collision loop: a candidate code is drawn from the generator and
/// handed to [`MappingRepository::reserve`]; taken or reserved codes are
/// regenerated up to `max_attempts` times.
pub struct ShortenerService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    max_attempts: usize,
}

impl<R: MappingRepository + ?Sized> ShortenerService<R> {
    /// Creates a new shortener service with [`DEFAULT_MAX_ATTEMPTS`].
    pub fn new(
        repository: Arc<R>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            base_url: base_url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the collision bound. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Creates a short link for `long_url`.
    ///
    /// The URL is stored exactly as submitted. Each call reserves a fresh code,
    /// so shortening the same URL twice yields two codes.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty or malformed (checked before
    ///   any store interaction)
    /// - [`AppError::StoreUnavailable`] if the store cannot be reached
    /// - [`AppError::ExhaustedRetries`] if every attempt collided
    pub async fn shorten(&self, long_url: &str) -> Result<ShortLink, AppError> {
        validate_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let code = self.reserve_unique_code(long_url).await?;

        Ok(ShortLink {
            short_url: self.short_url(&code),
            code,
            long_url: long_url.to_string(),
        })
    }

    /// Resolves a code to its target URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `code` is empty
    /// - [`AppError::NotFound`] if no mapping exists
    /// - [`AppError::StoreUnavailable`] if the store cannot be reached
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.get_mapping(code).await.map(|m| m.target_url)
    }

    /// Retrieves the full mapping record for a code.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub async fn get_mapping(&self, code: &str) -> Result<Mapping, AppError> {
        if code.is_empty() {
            return Err(AppError::bad_request("Short path not provided", json!({})));
        }

        match self.repository.lookup(code).await? {
            Some(mapping) => {
                metrics::counter!("snip_resolve_total", "outcome" => "hit").increment(1);
                Ok(mapping)
            }
            None => {
                metrics::counter!("snip_resolve_total", "outcome" => "miss").increment(1);
                debug!(code = %code, "Short code not found");
                Err(AppError::not_found(
                    "Short link not found",
                    json!({ "code": code }),
                ))
            }
        }
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Draws candidate codes until one is reserved for `long_url`.
    async fn reserve_unique_code(&self, long_url: &str) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();

            if code.is_empty() || RESERVED_CODES.contains(&code.as_str()) {
                warn!(attempt, code = %code, "Generated unusable code, regenerating");
                continue;
            }

            let new_mapping = NewMapping::now(code, long_url);
            if self.repository.reserve(&new_mapping).await? {
                metrics::counter!("snip_shorten_total").increment(1);
                info!(code = %new_mapping.code, attempt, "Created short link");
                return Ok(new_mapping.code);
            }

            metrics::counter!("snip_code_collisions_total").increment(1);
            warn!(attempt, code = %new_mapping.code, "Code collision, retrying");
        }

        Err(AppError::exhausted_retries(
            "Failed to generate unique code",
            json!({ "attempts": self.max_attempts }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingRepository;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out a fixed list of codes, then repeats the last one.
    struct SequenceGenerator {
        codes: Mutex<VecDeque<String>>,
        last: String,
    }

    impl SequenceGenerator {
        fn new(codes: &[&str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
                last: codes.last().map(|c| c.to_string()).unwrap_or_default(),
            }
        }
    }

    impl CodeGenerator for SequenceGenerator {
        fn generate(&self) -> String {
            self.codes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.last.clone())
        }
    }

    fn service(
        repo: MockMappingRepository,
        codes: &[&str],
    ) -> ShortenerService<MockMappingRepository> {
        ShortenerService::new(
            Arc::new(repo),
            Arc::new(SequenceGenerator::new(codes)),
            "http://localhost:8000",
        )
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_reserve()
            .withf(|m| m.code == "abc123" && m.target_url == "https://example.com")
            .times(1)
            .returning(|_| Ok(true));

        let service = service(mock_repo, &["abc123"]);

        let link = service.shorten("https://example.com").await.unwrap();

        assert_eq!(link.code, "abc123");
        assert_eq!(link.short_url, "http://localhost:8000/abc123");
        assert_eq!(link.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_shorten_regenerates_on_collision() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_reserve()
            .withf(|m| m.code == "taken1")
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_reserve()
            .withf(|m| m.code == "fresh2")
            .times(1)
            .returning(|_| Ok(true));

        let service = service(mock_repo, &["taken1", "fresh2"]);

        let link = service.shorten("https://example.com").await.unwrap();
        assert_eq!(link.code, "fresh2");
    }

    #[tokio::test]
    async fn test_shorten_exhausts_retries() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_reserve()
            .times(3)
            .returning(|_| Ok(false));

        let service = service(mock_repo, &["taken"]).with_max_attempts(3);

        let result = service.shorten("https://example.com").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::ExhaustedRetries { .. }
        ));
    }

    #[tokio::test]
    async fn test_shorten_skips_reserved_codes() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_reserve()
            .withf(|m| m.code == "ok1234")
            .times(1)
            .returning(|_| Ok(true));

        let service = service(mock_repo, &["health", "shorten", "ok1234"]);

        let link = service.shorten("https://example.com").await.unwrap();
        assert_eq!(link.code, "ok1234");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url_never_touches_store() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_reserve().times(0);

        let service = service(mock_repo, &["abc123"]);

        for url in ["", "not-a-url", "javascript:alert(1)"] {
            let result = service.shorten(url).await;
            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_shorten_propagates_store_unavailable() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_reserve()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("down", json!({}))));

        let service = service(mock_repo, &["abc123"]);

        let result = service.shorten("https://example.com").await;
        assert!(matches!(
            result.unwrap_err(),
            AppError::StoreUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_existing() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_lookup()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| {
                Ok(Some(Mapping::new(
                    code.to_string(),
                    "https://example.com".to_string(),
                    Some(Utc::now()),
                )))
            });

        let service = service(mock_repo, &[]);

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_lookup()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(mock_repo, &[]);

        let result = service.resolve("missing").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_empty_code() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo.expect_lookup().times(0);

        let service = service(mock_repo, &[]);

        let result = service.resolve("").await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = ShortenerService::new(
            Arc::new(MockMappingRepository::new()),
            Arc::new(SequenceGenerator::new(&[])),
            "https://s.example.com/",
        );

        assert_eq!(service.short_url("abc"), "https://s.example.com/abc");
    }

    #[test]
    fn test_max_attempts_floor() {
        let floored = service(MockMappingRepository::new(), &[]).with_max_attempts(0);
        assert_eq!(floored.max_attempts(), 1);

        let default = service(MockMappingRepository::new(), &[]);
        assert_eq!(default.max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }
}
