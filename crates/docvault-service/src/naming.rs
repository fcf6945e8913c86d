//! Folder name and document title rules.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// Longest accepted folder name or document title, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Trim `value` and check it is non-blank and within [`MAX_NAME_LEN`].
///
/// Failures are validation errors whose details name `field`.
pub fn normalize_name(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    let problem = if trimmed.is_empty() {
        "must not be blank".to_string()
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        format!("must be at most {MAX_NAME_LEN} characters")
    } else {
        return Ok(trimmed.to_string());
    };

    Err(AppError::validation(format!("Invalid {field}"))
        .with_details(serde_json::json!({ field: [problem] })))
}

#[cfg(test)]
mod tests {
    use docvault_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize_name("name", "  Invoices\t").unwrap(), "Invoices");
    }

    #[test]
    fn test_rejects_whitespace_only() {
        for blank in ["", "   ", "\t \n"] {
            let err = normalize_name("title", blank).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
            assert_eq!(err.details.unwrap()["title"][0], "must not be blank");
        }
    }

    #[test]
    fn test_length_counts_characters_after_trimming() {
        let exact = "é".repeat(MAX_NAME_LEN);
        assert!(normalize_name("name", &format!("  {exact}  ")).is_ok());

        let err = normalize_name("name", &"x".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
