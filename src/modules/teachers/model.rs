//! Teacher data models and DTOs.
//!
//! This module re-exports teacher models from the `rollbook-models` crate.

pub use rollbook_models::teachers::*;
