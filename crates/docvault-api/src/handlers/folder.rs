//! Folder CRUD and ordering handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use docvault_core::types::FolderId;
use docvault_entity::folder::{Folder, FolderDetail};
use docvault_service::UpdateFolderRequest as SvcUpdateFolder;

use crate::dto::request::{CreateFolderRequest, ReorderFolderRequest, UpdateFolderRequest};
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<Vec<FolderDetail>>, ApiError> {
    Ok(Json(state.folder_service.list_folders().await?))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderDetail>), ApiError> {
    let folder = state
        .folder_service
        .create_folder(&req.name, req.position)
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FolderDetail>, ApiError> {
    let id: FolderId = parse_id(&id, "id")?;
    Ok(Json(state.folder_service.get_folder(id).await?))
}

/// PUT /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> Result<Json<FolderDetail>, ApiError> {
    let id: FolderId = parse_id(&id, "id")?;
    let folder = state
        .folder_service
        .update_folder(
            id,
            SvcUpdateFolder {
                name: req.name,
                position: req.position,
            },
        )
        .await?;
    Ok(Json(folder))
}

/// PUT /api/folders/reorder
pub async fn reorder_folders(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ReorderFolderRequest>,
) -> Result<Json<Vec<Folder>>, ApiError> {
    Ok(Json(
        state.folder_service.reorder(req.id, req.position).await?,
    ))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: FolderId = parse_id(&id, "id")?;
    state.folder_service.delete_folder(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
