//! Fixed collaborator contract: table names, bucket, media types and limits.

/// Largest accepted attachment, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const CONTENT_TYPE_XLS: &str = "application/vnd.ms-excel";
pub const CONTENT_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CONTENT_TYPE_CSV: &str = "text/csv";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Media types accepted by the upload gate.
pub const ALLOWED_UPLOAD_CONTENT_TYPES: [&str; 3] =
    [CONTENT_TYPE_XLS, CONTENT_TYPE_XLSX, CONTENT_TYPE_CSV];

/// Default object storage bucket for attachments.
pub const DEFAULT_UPLOAD_BUCKET: &str = "lr_files";

pub const FILES_TABLE: &str = "lr_files";
pub const BRAND_SUBMISSIONS_TABLE: &str = "lr_submissions";
pub const BUSINESS_SUBMISSIONS_TABLE: &str = "rne_submissions";
pub const REGISTRATIONS_TABLE: &str = "rne_registrations";

/// SQLSTATE reported by the store when a unique constraint is violated.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";
