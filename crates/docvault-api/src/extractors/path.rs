//! Typed path parameter helpers.

use std::str::FromStr;

use docvault_core::error::AppError;

/// Parse an identifier from a path segment, naming the parameter on failure.
pub fn parse_id<T: FromStr>(raw: &str, param: &str) -> Result<T, AppError> {
    raw.parse().map_err(|_| {
        AppError::validation(format!("Invalid {param}: {raw}"))
            .with_details(serde_json::json!({ param: ["must be a UUID"] }))
    })
}

#[cfg(test)]
mod tests {
    use docvault_core::error::ErrorKind;
    use docvault_core::types::FolderId;

    use super::*;

    #[test]
    fn test_parse_id() {
        let id = FolderId::new();
        assert_eq!(parse_id::<FolderId>(&id.to_string(), "id").unwrap(), id);

        let err = parse_id::<FolderId>("not-a-uuid", "id").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.details, Some(serde_json::json!({"id": ["must be a UUID"]})));
    }
}
