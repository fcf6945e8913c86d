//! # docvault-database
//!
//! Persistence for DocVault: the [`FolderStore`] and [`DocumentStore`]
//! traits, PostgreSQL repositories built on sqlx, an in-memory store for
//! tests and demos, and [`DatabaseBackend`] which picks one of them from
//! configuration.

pub mod backend;
pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use backend::DatabaseBackend;
pub use connection::DatabasePool;
pub use store::{DocumentStore, FolderStore};
