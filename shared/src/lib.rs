//! Shared types and models for the FarmLink platform
//!
//! This crate holds the pure domain logic shared by the backend and its
//! tests: models, validation, crop scoring and cache key derivation.

pub mod cache_key;
pub mod models;
pub mod scoring;
pub mod types;
pub mod validation;

pub use models::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
