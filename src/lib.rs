//! # snip
//!
//! A small URL shortener backed by a key-value store, built with Axum and Redis.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Mapping entities and the store trait
//! - **Application Layer** ([`application`]) - Shortening and resolution service
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random 63-bit ids encoded as base58 (or base62, or a fixed-length alphabet)
//! - Atomic code reservation with bounded collision retries
//! - JSON or form submission, 307 redirects
//! - Admin CLI (`snip-admin`)
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"
//! export BASE_URL="http://localhost:8000"
//!
//! cargo run
//!
//! curl -d '{"url":"https://example.com"}' -H 'Content-Type: application/json' \
//!     http://localhost:8000/shorten
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ShortLink, ShortenerService};
    pub use crate::domain::entities::{Mapping, NewMapping};
    pub use crate::domain::repositories::MappingRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{InMemoryMappingStore, RedisMappingStore};
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::CodeGenerator;
}
