//! Document inspection CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::DocumentDetail;

use crate::output::{self, OutputFormat};

/// Arguments for document commands
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Document subcommand
    #[command(subcommand)]
    pub command: DocumentCommand,
}

/// Document subcommands
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// List documents, optionally within one folder
    List {
        /// Folder ID
        #[arg(short, long)]
        folder: Option<FolderId>,
    },
    /// List the versions of one document, newest first
    Versions {
        /// Document ID
        id: DocumentId,
    },
}

/// Document display row
#[derive(Debug, Serialize, Tabled)]
struct DocumentRow {
    /// Document ID
    id: String,
    /// Title
    title: String,
    /// MIME type
    mime_type: String,
    /// Number of versions
    versions: usize,
    /// Latest version size in bytes
    latest_size: String,
    /// Updated at
    updated_at: String,
}

impl From<&DocumentDetail> for DocumentRow {
    fn from(detail: &DocumentDetail) -> Self {
        Self {
            id: detail.document.id.to_string(),
            title: detail.document.title.clone(),
            mime_type: detail.document.mime_type.clone(),
            versions: detail.versions.len(),
            latest_size: detail
                .latest_version()
                .map(|v| v.size.to_string())
                .unwrap_or_default(),
            updated_at: detail.document.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Version display row
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version ID
    id: String,
    /// Filename
    name: String,
    /// Size in bytes
    size: i64,
    /// Uploaded at
    uploaded_at: String,
}

/// Execute document commands
pub async fn execute(
    args: &DocumentArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config).await?;

    match &args.command {
        DocumentCommand::List { folder } => {
            let folder_ids = match folder {
                Some(folder_id) => vec![*folder_id],
                None => state
                    .database
                    .folders()
                    .list_ordered()
                    .await?
                    .into_iter()
                    .map(|f| f.id)
                    .collect(),
            };
            let mut documents = Vec::new();
            for folder_id in folder_ids {
                documents.extend(state.document_service.list_in_folder(folder_id).await?);
            }
            let rows: Vec<DocumentRow> = documents.iter().map(DocumentRow::from).collect();
            output::print_list(&rows, format);
        }
        DocumentCommand::Versions { id } => {
            let detail = state.document_service.get_document(*id).await?;
            let rows: Vec<VersionRow> = detail
                .versions
                .iter()
                .map(|v| VersionRow {
                    id: v.id.to_string(),
                    name: v.name.clone(),
                    size: v.size,
                    uploaded_at: v.uploaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    state.database.close().await;
    Ok(())
}
