//! Document, version upload, and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use docvault_core::error::AppError;
use docvault_core::types::{DocumentId, FileVersionId, FolderId};
use docvault_entity::document::{CreateDocument, DocumentDetail, FileVersion, UpdateDocument};
use docvault_service::Download;

use crate::dto::request::UpdateDocumentRequest;
use crate::error::ApiError;
use crate::extractors::{UploadForm, ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /api/documents (multipart: `title`, `description`, `folderId`, `file`)
pub async fn create_document(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<(StatusCode, Json<DocumentDetail>), ApiError> {
    let title = form.require_text("title")?.to_string();
    let folder_id: FolderId = parse_id(form.require_text("folderId")?, "folderId")?;
    let description = form.text("description").map(str::to_string);
    let file = form.take_file()?;

    let detail = state
        .document_service
        .create_document(
            CreateDocument {
                folder_id,
                title,
                description,
            },
            file,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/documents/folder/{folder_id}
pub async fn list_folder_documents(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Result<Json<Vec<DocumentDetail>>, ApiError> {
    let folder_id: FolderId = parse_id(&folder_id, "folderId")?;
    Ok(Json(
        state.document_service.list_in_folder(folder_id).await?,
    ))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentDetail>, ApiError> {
    let id: DocumentId = parse_id(&id, "id")?;
    Ok(Json(state.document_service.get_document(id).await?))
}

/// PUT /api/documents/{id}
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateDocumentRequest>,
) -> Result<Json<DocumentDetail>, ApiError> {
    let id: DocumentId = parse_id(&id, "id")?;
    let description = req
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let detail = state
        .document_service
        .update_document(
            id,
            UpdateDocument {
                title: req.title,
                description,
            },
        )
        .await?;
    Ok(Json(detail))
}

/// DELETE /api/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: DocumentId = parse_id(&id, "id")?;
    state.document_service.delete_document(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/documents/{id}/versions (multipart: `file`)
pub async fn add_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: UploadForm,
) -> Result<(StatusCode, Json<FileVersion>), ApiError> {
    let id: DocumentId = parse_id(&id, "id")?;
    let file = form.take_file()?;
    let version = state.document_service.add_version(id, file).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// GET /api/documents/{id}/download
pub async fn download_latest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: DocumentId = parse_id(&id, "id")?;
    let download = state.document_service.open_latest(id).await?;
    file_response(download)
}

/// GET /api/documents/versions/{version_id}/download
pub async fn download_version(
    State(state): State<AppState>,
    Path(version_id): Path<String>,
) -> Result<Response, ApiError> {
    let version_id: FileVersionId = parse_id(&version_id, "versionId")?;
    let download = state.document_service.open_version(version_id).await?;
    file_response(download)
}

/// Stream a stored file back as an attachment.
fn file_response(download: Download) -> Result<Response, ApiError> {
    let safe_name: String = download
        .file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let disposition = format!("attachment; filename=\"{safe_name}\"");

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_DISPOSITION, disposition);
    if download.size >= 0 {
        builder = builder.header(header::CONTENT_LENGTH, download.size);
    }

    builder
        .body(Body::from_stream(download.stream))
        .map_err(|e| ApiError(AppError::internal(format!("Failed to build response: {e}"))))
}
