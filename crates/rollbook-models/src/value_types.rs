//! Value types shared across the role records.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Gender recorded on guardians, teachers, and students.
///
/// Maps to the Postgres `gender` enum type; serializes lowercase on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        })
    }
}
