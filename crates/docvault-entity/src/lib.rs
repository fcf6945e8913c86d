//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`; all of them serialize with
//! camelCase field names, which is the wire format of the HTTP API.

pub mod document;
pub mod folder;
