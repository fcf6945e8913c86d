//! Stored-file key generation.

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

/// Longest extension carried over from the uploaded filename.
const MAX_EXTENSION_LEN: usize = 10;

/// Build a fresh storage key for an upload: `<unix-millis>-<uuid><ext>`.
///
/// The extension of `original_name` is kept (lowercased) when it is short
/// and alphanumeric, so downloads can still guess a content type from it.
pub fn generate_storage_key(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let unique = Uuid::new_v4().simple();
    match extension(original_name) {
        Some(ext) => format!("{millis}-{unique}.{ext}"),
        None => format!("{millis}-{unique}"),
    }
}

fn extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
