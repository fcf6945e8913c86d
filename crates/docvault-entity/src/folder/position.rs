//! Position assignment value object.

use serde::{Deserialize, Serialize};

use docvault_core::types::FolderId;

/// A single `(folder, new position)` write produced by a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    /// The folder to move.
    pub folder_id: FolderId,
    /// Its new zero-based position.
    pub position: i32,
}

impl PositionUpdate {
    /// Create a new position update.
    pub fn new(folder_id: FolderId, position: i32) -> Self {
        Self {
            folder_id,
            position,
        }
    }
}
