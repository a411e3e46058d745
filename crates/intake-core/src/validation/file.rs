//! Client-side gate for attachments
//!
//! Runs before anything touches the network: the declared media type must be a
//! spreadsheet or CSV type and the size must not exceed [`MAX_UPLOAD_BYTES`].

use crate::constants::{
    ALLOWED_UPLOAD_CONTENT_TYPES, CONTENT_TYPE_CSV, CONTENT_TYPE_OCTET_STREAM, CONTENT_TYPE_XLS,
    CONTENT_TYPE_XLSX, MAX_UPLOAD_BYTES,
};
use crate::error::{LogLevel, UserFacing};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("Unsupported content type: {content_type}")]
    UnsupportedType { content_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

impl UserFacing for FileRejection {
    fn title(&self) -> &'static str {
        match self {
            FileRejection::UnsupportedType { .. } => "Invalid file type",
            FileRejection::TooLarge { .. } => "File too large",
        }
    }

    fn user_message(&self) -> String {
        match self {
            FileRejection::UnsupportedType { .. } => {
                "Please upload an Excel (.xls, .xlsx) or CSV file".to_string()
            }
            FileRejection::TooLarge { max, .. } => {
                format!("Maximum file size is {}MB", max / (1024 * 1024))
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Allow-list and size ceiling check
#[derive(Debug, Clone)]
pub struct FileGate {
    allowed_content_types: Vec<String>,
    max_size: u64,
}

impl Default for FileGate {
    fn default() -> Self {
        Self {
            allowed_content_types: ALLOWED_UPLOAD_CONTENT_TYPES
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
            max_size: MAX_UPLOAD_BYTES,
        }
    }
}

impl FileGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Type is checked first; a file larger than the ceiling is rejected, one of
    /// exactly the ceiling is accepted.
    pub fn check(&self, content_type: &str, size: u64) -> Result<(), FileRejection> {
        if !self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == content_type)
        {
            return Err(FileRejection::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }

        if size > self.max_size {
            return Err(FileRejection::TooLarge {
                size,
                max: self.max_size,
            });
        }

        Ok(())
    }
}

/// Media type a browser would declare for `name`, for callers that only have a path.
pub fn content_type_for_file_name(name: &str) -> &'static str {
    let extension = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return CONTENT_TYPE_OCTET_STREAM,
    };

    match extension.as_str() {
        "xls" => CONTENT_TYPE_XLS,
        "xlsx" => CONTENT_TYPE_XLSX,
        "csv" => CONTENT_TYPE_CSV,
        _ => CONTENT_TYPE_OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_each_allowed_type() {
        let gate = FileGate::new();
        for ct in ALLOWED_UPLOAD_CONTENT_TYPES {
            assert!(gate.check(ct, 1024).is_ok(), "{ct} should be accepted");
        }
    }

    #[test]
    fn test_rejects_other_types_regardless_of_size() {
        let gate = FileGate::new();
        for ct in [
            "application/pdf",
            "image/png",
            "TEXT/CSV",
            "text/plain",
            "",
        ] {
            assert!(matches!(
                gate.check(ct, 10),
                Err(FileRejection::UnsupportedType { .. })
            ));
        }
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let gate = FileGate::new();
        assert!(gate.check(CONTENT_TYPE_CSV, MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            gate.check(CONTENT_TYPE_XLSX, MAX_UPLOAD_BYTES + 1),
            Err(FileRejection::TooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                max: MAX_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn test_rejection_messages() {
        let too_large = FileRejection::TooLarge {
            size: MAX_UPLOAD_BYTES + 1,
            max: MAX_UPLOAD_BYTES,
        };
        assert_eq!(too_large.title(), "File too large");
        assert_eq!(too_large.user_message(), "Maximum file size is 10MB");

        let wrong_type = FileRejection::UnsupportedType {
            content_type: "image/png".to_string(),
        };
        assert_eq!(wrong_type.title(), "Invalid file type");
    }

    #[test]
    fn test_content_type_from_name() {
        assert_eq!(content_type_for_file_name("q1.CSV"), CONTENT_TYPE_CSV);
        assert_eq!(content_type_for_file_name("a.b.xlsx"), CONTENT_TYPE_XLSX);
        assert_eq!(content_type_for_file_name("legacy.xls"), CONTENT_TYPE_XLS);
        assert_eq!(
            content_type_for_file_name("notes.txt"),
            CONTENT_TYPE_OCTET_STREAM
        );
        assert_eq!(
            content_type_for_file_name("README"),
            CONTENT_TYPE_OCTET_STREAM
        );
    }
}
