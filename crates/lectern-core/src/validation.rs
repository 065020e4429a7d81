//! Upload validation rules.

use crate::error::AppError;

const MAX_NAME_CHARS: usize = 255;

/// Check an upload payload against the configured size cap for its kind.
pub fn validate_payload_size(size: usize, max: usize) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::InvalidInput("Empty file".to_string()));
    }
    if size > max {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large: {} bytes (max: {} bytes)",
            size, max
        )));
    }
    Ok(())
}

/// Normalize a client-supplied filename for storage in the metadata record.
///
/// Keeps arbitrary Unicode (the record is user-facing; header transport is
/// encoded separately at serve time) but strips any path components and
/// control characters, and caps the length. Falls back to "file" when
/// nothing usable remains.
pub fn normalize_original_name(raw: &str) -> String {
    let base = std::path::Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '/' && *c != '\\')
        .take(MAX_NAME_CHARS)
        .collect();
    if cleaned.trim().is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_rejected() {
        let err = validate_payload_size(0, 1024).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let err = validate_payload_size(2048, 1024).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_payload_within_cap_accepted() {
        assert!(validate_payload_size(1024, 1024).is_ok());
        assert!(validate_payload_size(1, 1024).is_ok());
    }

    #[test]
    fn test_path_components_stripped() {
        assert_eq!(normalize_original_name("../../etc/passwd"), "passwd");
        assert_eq!(normalize_original_name("dir/lecture.mp4"), "lecture.mp4");
    }

    #[test]
    fn test_unicode_names_preserved() {
        assert_eq!(normalize_original_name("課程 ① コース.pdf"), "課程 ① コース.pdf");
        assert_eq!(normalize_original_name("résumé.pdf"), "résumé.pdf");
    }

    #[test]
    fn test_control_characters_removed() {
        assert_eq!(normalize_original_name("notes\u{0}\u{7}.txt"), "notes.txt");
    }

    #[test]
    fn test_blank_name_falls_back() {
        assert_eq!(normalize_original_name(""), "file");
        assert_eq!(normalize_original_name("   "), "file");
    }

    #[test]
    fn test_long_name_truncated() {
        let long = "a".repeat(1000) + ".pdf";
        assert_eq!(normalize_original_name(&long).chars().count(), 255);
    }
}
