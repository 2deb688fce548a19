use std::path::Path;

use rusqlite::{params, Connection};

use crate::record::{PatientInputs, PatientRecord, RecordId, StoredRecord};
use crate::schema::PATIENTS_SCHEMA;
use crate::StoreError;

/// SQLite-backed case log. Owned by a single service loop, see [`crate::service`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory store, gone when dropped.
    pub fn memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        enable_wal(&conn);
        conn.execute_batch(PATIENTS_SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn save(&self, record: &PatientRecord) -> Result<RecordId, StoreError> {
        let inputs = &record.inputs;
        self.conn.execute(
            "INSERT INTO patients (name, age, pregnancies, glucose, bloodpressure, skinthickness,
                                   insulin, bmi, dpf, probability, prediction)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.name,
                inputs.age,
                inputs.pregnancies,
                inputs.glucose,
                inputs.bloodpressure,
                inputs.skinthickness,
                inputs.insulin,
                inputs.bmi,
                inputs.dpf,
                record.probability,
                record.prediction,
            ],
        )?;
        Ok(RecordId(self.conn.last_insert_rowid()))
    }

    /// Every record, most recent first.
    pub fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, age, pregnancies, glucose, bloodpressure, skinthickness,
                    insulin, bmi, dpf, probability, prediction
             FROM patients ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], row_to_record)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// Switches to WAL and returns the journal mode in effect. In-memory
/// databases stay in `memory` mode.
fn enable_wal(conn: &Connection) -> Option<String> {
    match conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0)) {
        Ok(mode) => {
            if !mode.eq_ignore_ascii_case("wal") {
                tracing::debug!(target: "diawell_store", journal_mode = %mode, "WAL not enabled");
            }
            Some(mode)
        }
        Err(error) => {
            tracing::debug!(target: "diawell_store", error = %error, "failed to enable WAL");
            None
        }
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        id: RecordId(row.get(0)?),
        record: PatientRecord {
            name: row.get(1)?,
            inputs: PatientInputs {
                age: row.get(2)?,
                pregnancies: row.get(3)?,
                glucose: row.get(4)?,
                bloodpressure: row.get(5)?,
                skinthickness: row.get(6)?,
                insulin: row.get(7)?,
                bmi: row.get(8)?,
                dpf: row.get(9)?,
            },
            probability: row.get(10)?,
            prediction: row.get(11)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diawell_model::FeatureVector;

    fn record(name: &str, glucose: f64) -> PatientRecord {
        let features =
            FeatureVector::from_array([1.0, glucose, 70.0, 20.0, 80.0, 25.1, 0.35, 33.0]);
        PatientRecord::new(name, &features, 0.4321, "No Risk")
    }

    #[test]
    fn save_assigns_increasing_ids() {
        let store = SqliteStore::memory().unwrap();
        let first = store.save(&record("a", 100.0)).unwrap();
        let second = store.save(&record("b", 110.0)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn list_all_is_most_recent_first() {
        let store = SqliteStore::memory().unwrap();
        for (name, glucose) in [("a", 100.0), ("b", 110.0), ("c", 120.0)] {
            store.save(&record(name, glucose)).unwrap();
        }

        let names: Vec<_> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|stored| stored.record.name)
            .collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn records_round_trip_through_sqlite() {
        let store = SqliteStore::memory().unwrap();
        let original = record("Ada", 180.0);
        let id = store.save(&original).unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(
            listed,
            [StoredRecord {
                id,
                record: original
            }]
        );
    }

    #[test]
    fn journal_mode_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = Connection::open(dir.path().join("wal.db")).unwrap();
        assert_eq!(enable_wal(&file).as_deref(), Some("wal"));

        let memory = Connection::open_in_memory().unwrap();
        assert_eq!(enable_wal(&memory).as_deref(), Some("memory"));
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diawell.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save(&record("a", 100.0)).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        store.save(&record("b", 100.0)).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 2);
    }
}
