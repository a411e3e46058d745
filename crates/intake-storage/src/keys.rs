//! Object namer
//!
//! Key format: `{uuid}.{extension}`, or the bare `{uuid}` when the original name
//! has no usable extension.

use intake_core::StorageKey;
use uuid::Uuid;

/// Substring after the final `.` of `file_name`.
///
/// Returns an empty string when there is no period, the name ends with a period,
/// or the suffix contains anything other than ASCII alphanumerics (so a key can
/// never gain a path separator from user input).
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => ext,
        _ => "",
    }
}

/// Generate a fresh storage key for an object uploaded as `file_name`.
pub fn generate_object_key(file_name: &str) -> StorageKey {
    let id = Uuid::new_v4();
    match file_extension(file_name) {
        "" => StorageKey::new(id.to_string()),
        ext => StorageKey::new(format!("{}.{}", id, ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_extension_is_last_segment() {
        assert_eq!(file_extension("report.csv"), "csv");
        assert_eq!(file_extension("q1.final.XLSX"), "XLSX");
        assert_eq!(file_extension(".csv"), "csv");
    }

    #[test]
    fn test_missing_or_unsafe_extension_is_empty() {
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension("weird.cs/v"), "");
        assert_eq!(file_extension("dots.c..v"), "v");
    }

    #[test]
    fn test_key_is_uuid_dot_extension() {
        let key = generate_object_key("sales.xlsx");
        let (id, ext) = key.as_str().split_once('.').unwrap();
        assert_eq!(ext, "xlsx");
        let parsed = Uuid::parse_str(id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_key_without_extension_is_bare_uuid() {
        let key = generate_object_key("Makefile");
        assert!(Uuid::parse_str(key.as_str()).is_ok());
        assert!(!key.as_str().contains('.'));
    }

    #[test]
    fn test_keys_do_not_collide() {
        let keys: HashSet<_> = (0..10_000).map(|_| generate_object_key("data.csv")).collect();
        assert_eq!(keys.len(), 10_000);
    }
}
