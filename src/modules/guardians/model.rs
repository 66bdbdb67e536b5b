//! Guardian data models and DTOs.
//!
//! This module re-exports guardian models from the `rollbook-models` crate.

pub use rollbook_models::guardians::*;
