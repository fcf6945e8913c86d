//! MIME type guessing from file names.

/// Content type used when the extension is unknown.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess a MIME type from a file name's extension.
pub fn mime_from_path(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => return None,
    };
    Some(mime)
}
