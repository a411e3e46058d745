#[cfg(feature = "postgres")]
use crate::PgTableWriter;
#[cfg(feature = "rest")]
use crate::RestTableWriter;
use crate::{InsertError, MemoryTableWriter, TableBackend, TableWriter};
use intake_core::IntakeConfig;
use std::sync::Arc;
#[cfg(any(feature = "rest", feature = "postgres"))]
use std::time::Duration;

/// Create a table writer based on configuration
pub async fn create_table_writer(
    config: &IntakeConfig,
) -> Result<Arc<dyn TableWriter>, InsertError> {
    match config.table_backend {
        #[cfg(feature = "rest")]
        TableBackend::Rest => {
            let base_url = config
                .backend_url
                .as_deref()
                .ok_or_else(|| InsertError::uncoded("INTAKE_BACKEND_URL not configured"))?;
            let api_key = config
                .api_key
                .as_deref()
                .ok_or_else(|| InsertError::uncoded("INTAKE_API_KEY not configured"))?;

            let timeout = Duration::from_secs(config.http_timeout_secs);
            let writer = RestTableWriter::new(base_url, api_key, timeout)?;
            Ok(Arc::new(writer))
        }

        #[cfg(not(feature = "rest"))]
        TableBackend::Rest => Err(InsertError::uncoded(
            "REST table backend not available (rest feature not enabled)",
        )),

        #[cfg(feature = "postgres")]
        TableBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| InsertError::uncoded("DATABASE_URL not configured"))?;

            let timeout = Duration::from_secs(config.http_timeout_secs);
            let writer = PgTableWriter::connect(database_url, timeout).await?;
            Ok(Arc::new(writer))
        }

        #[cfg(not(feature = "postgres"))]
        TableBackend::Postgres => Err(InsertError::uncoded(
            "Postgres table backend not available (postgres feature not enabled)",
        )),

        TableBackend::Memory => Ok(Arc::new(MemoryTableWriter::new())),
    }
}
