//! Configuration module
//!
//! Connection settings for the hosted backend (object storage and table API) and
//! the choice of storage/table backends. Values come from the process environment,
//! optionally seeded from a `.env` file.

use std::env;

use crate::backend_types::{StorageBackend, TableBackend};
use crate::constants::DEFAULT_UPLOAD_BUCKET;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub environment: String,
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub storage_backend: StorageBackend,
    pub table_backend: TableBackend,
    pub database_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub upload_bucket: String,
    pub http_timeout_secs: u64,
    /// Delete an uploaded object again when its metadata row cannot be written
    pub cleanup_orphaned_objects: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            backend_url: None,
            api_key: None,
            storage_backend: StorageBackend::Remote,
            table_backend: TableBackend::Rest,
            database_url: None,
            local_storage_path: None,
            upload_bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            cleanup_orphaned_objects: true,
        }
    }
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => defaults.storage_backend,
        };

        let table_backend = match lookup("DB_BACKEND") {
            Some(s) => s.parse()?,
            None => defaults.table_backend,
        };

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid number"))?,
            None => defaults.http_timeout_secs,
        };

        let cleanup_orphaned_objects = lookup("CLEANUP_ORPHANED_OBJECTS")
            .map(|s| s.trim().to_lowercase())
            .map(|s| !matches!(s.as_str(), "false" | "0" | "no" | "off"))
            .unwrap_or(defaults.cleanup_orphaned_objects);

        let config = IntakeConfig {
            environment,
            backend_url: lookup("INTAKE_BACKEND_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            api_key: lookup("INTAKE_API_KEY")
                .filter(|key| !key.trim().is_empty()),
            storage_backend,
            table_backend,
            database_url: lookup("DATABASE_URL"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            upload_bucket: lookup("UPLOAD_BUCKET")
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .unwrap_or(defaults.upload_bucket),
            http_timeout_secs,
            cleanup_orphaned_objects,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    fn needs_hosted_backend(&self) -> bool {
        self.storage_backend == StorageBackend::Remote || self.table_backend == TableBackend::Rest
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.needs_hosted_backend() {
            if self.backend_url.is_none() {
                return Err(anyhow::anyhow!(
                    "INTAKE_BACKEND_URL must be set for the remote storage or rest table backend"
                ));
            }
            if self.api_key.is_none() {
                return Err(anyhow::anyhow!(
                    "INTAKE_API_KEY must be set for the remote storage or rest table backend"
                ));
            }
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
            ));
        }

        if self.table_backend == TableBackend::Postgres && self.database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be set when DB_BACKEND=postgres"
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.is_production()
            && (self.storage_backend == StorageBackend::Memory
                || self.table_backend == TableBackend::Memory)
        {
            return Err(anyhow::anyhow!(
                "In-memory backends cannot be used in production"
            ));
        }

        Ok(())
    }
}
