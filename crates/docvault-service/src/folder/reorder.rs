//! Dense zero-based folder ordering.
//!
//! [`plan_reorder`] is pure: it takes the current folder list and returns
//! the new order plus the minimal set of position writes. Applying the
//! writes atomically is the store's job.

use docvault_core::error::AppError;
use docvault_core::types::FolderId;
use docvault_entity::folder::{Folder, PositionUpdate};

/// Why a reorder could not be planned. No writes are produced in either
/// case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// The folder to move is not in the list.
    #[error("Folder {0} not found")]
    NotFound(FolderId),
    /// The target index lies outside `[0, len - 1]`.
    #[error("Target position {target} is out of range for {len} folders")]
    InvalidTarget {
        /// Requested index.
        target: i32,
        /// Number of folders.
        len: usize,
    },
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::NotFound(_) => AppError::not_found(err.to_string()),
            ReorderError::InvalidTarget { target, len } => AppError::validation(err.to_string())
                .with_details(serde_json::json!({
                    "position": target,
                    "max": len.saturating_sub(1),
                })),
        }
    }
}

/// Outcome of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// Every folder ID in its new order.
    pub order: Vec<FolderId>,
    /// Only the folders whose position changes, in new-order sequence.
    pub updates: Vec<PositionUpdate>,
}

impl ReorderPlan {
    /// Whether applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Plan moving `moving_id` to `target_index` within `folders`.
///
/// Folders are stably sorted by their current position first, so the
/// caller's ordering does not matter. After the returned updates are
/// applied, positions are exactly `0..len` and agree with `order`.
pub fn plan_reorder(
    folders: &[Folder],
    moving_id: FolderId,
    target_index: i32,
) -> Result<ReorderPlan, ReorderError> {
    let mut sequence: Vec<&Folder> = folders.iter().collect();
    sequence.sort_by_key(|f| f.position);

    let from = sequence
        .iter()
        .position(|f| f.id == moving_id)
        .ok_or(ReorderError::NotFound(moving_id))?;

    let len = sequence.len();
    let target = usize::try_from(target_index)
        .ok()
        .filter(|t| *t < len)
        .ok_or(ReorderError::InvalidTarget {
            target: target_index,
            len,
        })?;

    let moving = sequence.remove(from);
    sequence.insert(target, moving);

    let mut updates = Vec::new();
    for (index, folder) in sequence.iter().enumerate() {
        // len came from a Vec of rows whose positions are i32.
        let position = index as i32;
        if folder.position != position {
            updates.push(PositionUpdate::new(folder.id, position));
        }
    }

    Ok(ReorderPlan {
        order: sequence.iter().map(|f| f.id).collect(),
        updates,
    })
}
