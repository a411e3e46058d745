use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Object storage backend types
///
/// Defined in core because configuration selects the backend before the
/// storage crate builds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Hosted storage API of the backend-as-a-service
    Remote,
    Local,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(StorageBackend::Remote),
            "local" => Ok(StorageBackend::Local),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Remote => write!(f, "remote"),
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Table (row insert) backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableBackend {
    /// PostgREST-style HTTP API
    Rest,
    Postgres,
    Memory,
}

impl FromStr for TableBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest" => Ok(TableBackend::Rest),
            "postgres" | "postgresql" => Ok(TableBackend::Postgres),
            "memory" => Ok(TableBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid table backend: {}", s)),
        }
    }
}

impl Display for TableBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TableBackend::Rest => write!(f, "rest"),
            TableBackend::Postgres => write!(f, "postgres"),
            TableBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Remote".parse::<StorageBackend>().unwrap(),
            StorageBackend::Remote
        );
        assert_eq!(
            " LOCAL ".parse::<StorageBackend>().unwrap(),
            StorageBackend::Local
        );
        assert_eq!(
            "postgresql".parse::<TableBackend>().unwrap(),
            TableBackend::Postgres
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("s3".parse::<StorageBackend>().is_err());
        assert!("mysql".parse::<TableBackend>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for backend in [
            TableBackend::Rest,
            TableBackend::Postgres,
            TableBackend::Memory,
        ] {
            assert_eq!(
                backend.to_string().parse::<TableBackend>().unwrap(),
                backend
            );
        }
    }
}
