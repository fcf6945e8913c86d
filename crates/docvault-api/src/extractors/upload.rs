//! Multipart upload form extractor.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;

use docvault_core::error::AppError;
use docvault_service::UploadedFile;

use crate::error::ApiError;

/// Content type assumed when a file part does not declare one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A parsed `multipart/form-data` body: text fields plus the `file` part.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    /// A text field, trimmed; empty values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// A required text field.
    pub fn require_text(&self, name: &str) -> Result<&str, AppError> {
        self.text(name).ok_or_else(|| {
            AppError::validation(format!("{name} is required"))
                .with_details(serde_json::json!({ name: ["required"] }))
        })
    }

    /// Take the uploaded file, failing when none was sent.
    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file.take().ok_or_else(|| {
            AppError::validation("No file uploaded")
                .with_details(serde_json::json!({ "file": ["required"] }))
        })
    }

    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self::read(multipart).await?)
    }
}

/// Body-limit hits become 413; anything else is a malformed request.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(err.body_text())
    } else {
        AppError::validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}
