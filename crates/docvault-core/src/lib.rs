//! # docvault-core
//!
//! Core crate for DocVault. Contains the unified error system,
//! configuration schemas, typed identifiers, and the storage provider
//! trait implemented by `docvault-storage`.
//!
//! This crate has **no** internal dependencies on other DocVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
