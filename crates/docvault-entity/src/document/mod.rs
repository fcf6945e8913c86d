//! Document and file version entities.

pub mod model;
pub mod version;

pub use model::{CreateDocument, Document, DocumentDetail, UpdateDocument};
pub use version::{FileVersion, NewFileVersion};
