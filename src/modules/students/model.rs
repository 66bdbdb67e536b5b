//! Student data models and DTOs.
//!
//! This module re-exports student models from the `rollbook-models` crate.

pub use rollbook_models::students::*;
