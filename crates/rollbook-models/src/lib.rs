//! Shared domain models for the rollbook API.
//!
//! Entities, request/response DTOs, and value types used by both the
//! application crate and its integration tests. Each role record (guardian,
//! teacher, student) owns exactly one [`users::User`] account row; students
//! additionally reference their guardian by foreign key.

pub mod guardians;
pub mod students;
pub mod teachers;
pub mod users;
pub mod value_types;
