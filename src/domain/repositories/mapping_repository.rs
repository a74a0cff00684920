//! Repository trait for code to URL mappings.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Store adapter enforcing at most one mapping per code.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisMappingStore`] - Redis, `SET NX` or check-then-set
/// - [`crate::infrastructure::store::InMemoryMappingStore`] - process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Creates the mapping if and only if `new_mapping.code` is absent.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the code was reserved for this mapping
    /// - `Ok(false)` if the code is already taken (the existing mapping is untouched)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the backend cannot be reached.
    async fn reserve(&self, new_mapping: &NewMapping) -> Result<bool, AppError>;

    /// Finds the mapping stored under `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the backend cannot be reached.
    async fn lookup(&self, code: &str) -> Result<Option<Mapping>, AppError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
