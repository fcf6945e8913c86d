//! Folder domain entities.

pub mod model;
pub mod position;

pub use model::{CreateFolder, Folder, FolderDetail};
pub use position::PositionUpdate;
