//! JSON body extractor that runs `validator` rules.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use docvault_core::error::AppError;

use crate::error::ApiError;

/// Like `Json<T>`, but rejects bodies that fail `T::validate()` with a 400
/// whose details list the failing fields.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

/// Convert validator failures into an `AppError` with per-field messages.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let fields: BTreeMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();

    AppError::validation("Request validation failed")
        .with_details(serde_json::to_value(fields).unwrap_or_default())
}
