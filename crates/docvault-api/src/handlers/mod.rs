//! HTTP request handlers grouped by resource.

pub mod document;
pub mod folder;
pub mod health;
