//! Repository trait definitions for the domain layer.
//!
//! - Traits define the contract for store operations
//! - Implementations live in `crate::infrastructure::store`
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod mapping_repository;

pub use mapping_repository::MappingRepository;

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
