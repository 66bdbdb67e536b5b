//! User data models and DTOs.
//!
//! This module re-exports user models from the `rollbook-models` crate.

pub use rollbook_models::users::*;
