//! Request validation plumbing.
//!
//! Bodies enter handlers through [`ValidatedJson`], which runs the derive
//! rules on the DTO and rejects with a field-name to violation-list map
//! covering every failed rule, not just the first. Uniqueness checks that
//! only the store can answer are accumulated by services into
//! [`FieldErrors`] and rejected in the same shape.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// Flatten `ValidationErrors` into a field-name to violation-list map.
pub fn validation_error_map(errors: &ValidationErrors) -> Value {
    let mut map = Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
            .map(Value::from)
            .collect();
        map.insert(field.to_string(), Value::from(messages));
    }
    Value::Object(map)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    let mut fields = Map::new();
                    fields.insert(
                        field.to_string(),
                        Value::from(vec![format!("{} is required", field)]),
                    );
                    return AppError::validation(Value::Object(fields));
                }

                if error_msg.contains("unknown variant") {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Invalid enum value in request"),
                    );
                }

                if error_msg.contains("invalid type") {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Invalid field type in request"),
                    );
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }

                AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request body"))
            })?;

        value
            .validate()
            .map_err(|errors| AppError::validation(validation_error_map(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Store-level violations (uniqueness checks) collected per field.
///
/// Mirrors the map shape produced by the derive rules so both layers
/// surface identically to clients.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject with the aggregated map, or continue when clean.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            return Ok(());
        }
        let map: Map<String, Value> = self
            .0
            .into_iter()
            .map(|(field, messages)| (field, Value::from(messages)))
            .collect();
        Err(AppError::validation(Value::Object(map)))
    }
}
