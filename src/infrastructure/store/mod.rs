//! Mapping store adapters.
//!
//! Provides two [`MappingRepository`](crate::domain::repositories::MappingRepository)
//! implementations:
//! - [`RedisMappingStore`] - Production Redis-backed store
//! - [`InMemoryMappingStore`] - Process-local store for development and tests

mod memory_store;
mod redis_store;

pub use memory_store::InMemoryMappingStore;
pub use redis_store::{RedisMappingStore, ReserveMode};
