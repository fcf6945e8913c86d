//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::types::FolderId;
use docvault_entity::folder::{Folder, FolderDetail};
use docvault_service::{MutationLedger, UpdateFolderRequest, plan_reorder};

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders in display order
    List,
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Zero-based position; appended when omitted
        #[arg(short, long)]
        position: Option<i32>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: FolderId,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Move a folder to a new position
    Reorder {
        /// Folder ID
        id: FolderId,
        /// Target zero-based position
        #[arg(short, long)]
        position: i32,
    },
    /// Delete a folder with its documents and stored files
    Delete {
        /// Folder ID
        id: FolderId,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Position
    position: i32,
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Document count
    documents: String,
    /// Updated at
    updated_at: String,
}

impl FolderRow {
    fn from_folder(folder: &Folder, documents: Option<usize>) -> Self {
        Self {
            position: folder.position,
            id: folder.id.to_string(),
            name: folder.name.clone(),
            documents: documents.map(|n| n.to_string()).unwrap_or_default(),
            updated_at: folder.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    fn from_detail(detail: &FolderDetail) -> Self {
        Self::from_folder(&detail.folder, Some(detail.documents.len()))
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config).await?;
    let service = &state.folder_service;

    match &args.command {
        FolderCommand::List => {
            let rows: Vec<FolderRow> = service
                .list_folders()
                .await?
                .iter()
                .map(FolderRow::from_detail)
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, position } => {
            let folder = service.create_folder(name.trim(), *position).await?;
            output::print_success(&format!(
                "Folder '{}' created at position {} (id: {})",
                folder.folder.name, folder.folder.position, folder.folder.id
            ));
        }
        FolderCommand::Rename { id, name } => {
            let folder = service
                .update_folder(
                    *id,
                    UpdateFolderRequest {
                        name: Some(name.clone()),
                        position: None,
                    },
                )
                .await?;
            output::print_success(&format!("Folder {} renamed to '{}'", id, folder.folder.name));
        }
        FolderCommand::Reorder { id, position } => {
            let current = state.database.folders().list_ordered().await?;
            let plan = plan_reorder(&current, *id, *position)?;
            if plan.is_noop() {
                output::print_success("Folder is already at that position.");
                return Ok(());
            }

            let request_id = Uuid::new_v4();
            let mut ledger = MutationLedger::new();
            ledger.begin(request_id, current.clone())?;

            println!("Planned order:");
            let preview: Vec<FolderRow> = plan
                .order
                .iter()
                .enumerate()
                .filter_map(|(index, folder_id)| {
                    let folder = current.iter().find(|f| f.id == *folder_id)?;
                    let mut row = FolderRow::from_folder(folder, None);
                    row.position = i32::try_from(index).unwrap_or(i32::MAX);
                    Some(row)
                })
                .collect();
            output::print_list(&preview, format);

            match service.reorder(*id, *position).await {
                Ok(order) => {
                    ledger.commit(request_id)?;
                    output::print_success(&format!(
                        "Moved folder {id} to position {position} ({} folders updated)",
                        plan.updates.len()
                    ));
                    let rows: Vec<FolderRow> = order
                        .iter()
                        .map(|f| FolderRow::from_folder(f, None))
                        .collect();
                    output::print_list(&rows, format);
                }
                Err(e) => {
                    let restored = ledger.rollback(request_id)?;
                    output::print_warning("Reorder rejected; the order is unchanged:");
                    let rows: Vec<FolderRow> = restored
                        .iter()
                        .map(|f| FolderRow::from_folder(f, None))
                        .collect();
                    output::print_list(&rows, format);
                    return Err(e);
                }
            }
        }
        FolderCommand::Delete { id, yes } => {
            let folder = service.get_folder(*id).await?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete folder '{}' with {} document(s) and all stored files?",
                        folder.folder.name,
                        folder.documents.len()
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let report = service.delete_folder(*id).await?;
            output::print_success(&format!(
                "Folder '{}' deleted ({} of {} stored files removed)",
                folder.folder.name,
                report.removed(),
                report.attempted
            ));
            for path in &report.failed {
                output::print_warning(&format!("Could not remove stored file {path}"));
            }
        }
    }

    state.database.close().await;
    Ok(())
}
