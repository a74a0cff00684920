//! Core domain entities.
//!
//! - [`Mapping`] - A persisted code to URL association
//! - [`NewMapping`] - Input for reserving a code

pub mod mapping;

pub use mapping::{Mapping, NewMapping, StoredMapping};
