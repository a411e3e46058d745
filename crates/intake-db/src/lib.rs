//! Row writers for the external tables
//!
//! This system only ever inserts: one metadata row per uploaded file and one row
//! per submitted form. The [`TableWriter`] trait hides whether rows go to the
//! hosted REST API, straight to Postgres, or to memory.

pub mod factory;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "rest")]
pub mod rest;
pub mod traits;

pub use factory::create_table_writer;
pub use intake_core::TableBackend;
pub use memory::MemoryTableWriter;
#[cfg(feature = "postgres")]
pub use postgres::PgTableWriter;
#[cfg(feature = "rest")]
pub use rest::RestTableWriter;
pub use traits::{insert_row, InsertError, Table, TableWriter};
