//! DDL for the append-only case log.
//!
//! Column names and types match databases written by earlier releases, so an
//! existing `diawell.db` opens without migration.

pub const PATIENTS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT,
    age           INTEGER,
    pregnancies   INTEGER,
    glucose       INTEGER,
    bloodpressure INTEGER,
    skinthickness INTEGER,
    insulin       INTEGER,
    bmi           REAL,
    dpf           REAL,
    probability   REAL,
    prediction    TEXT
);
"#;
