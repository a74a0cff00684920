//! Utility functions for code generation and URL validation.
//!
//! - [`code_generator`] - Short code generation strategies
//! - [`url_validator`] - Target URL validation

pub mod code_generator;
pub mod url_validator;
