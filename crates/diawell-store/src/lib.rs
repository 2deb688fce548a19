pub mod handle;
pub mod record;
pub mod schema;
pub mod service;
pub mod sqlite;

use thiserror::Error;

pub use handle::{RecordStore, StoreHandle, StoreRequest};
pub use record::{PatientInputs, PatientRecord, RecordId, StoredRecord};
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("record store is not running")]
    Closed,
}
