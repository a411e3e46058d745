use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which an uploaded object is stored, e.g. `9b2c…e1.csv`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata row describing an uploaded object (`lr_files`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUploadedFile {
    pub file_name: String,
    pub file_path: StorageKey,
    pub content_type: String,
    pub size: i64,
}
