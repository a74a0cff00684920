//! Domain layer containing the mapping entity and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - The [`entities::Mapping`] record and its creation input
//! - [`repositories`] - The [`repositories::MappingRepository`] trait implemented
//!   by `crate::infrastructure::store`
//!
//! The domain layer has no dependency on Redis, HTTP or configuration. The
//! collision loop that drives reservations lives in
//! [`crate::application::services::ShortenerService`].

pub mod entities;
pub mod repositories;
