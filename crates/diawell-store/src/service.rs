use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::handle::{StoreHandle, StoreRequest};
use crate::sqlite::SqliteStore;

/// Starts the service loop on a blocking thread and returns its handle.
///
/// Must be called from within a tokio runtime.
pub fn spawn(store: SqliteStore) -> (StoreHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::task::spawn_blocking(move || run(rx, store));
    (StoreHandle::new(tx), task)
}

/// Owns the connection and applies requests one at a time, which serializes
/// writes. Exits on `Shutdown` or once every handle is dropped.
pub fn run(mut rx: mpsc::UnboundedReceiver<StoreRequest>, store: SqliteStore) {
    tracing::info!(target: "diawell_store", "service loop started");

    while let Some(req) = rx.blocking_recv() {
        match req {
            StoreRequest::Save { record, reply } => {
                let result = store.save(&record);
                match &result {
                    Ok(id) => tracing::info!(
                        target: "diawell_store",
                        id = id.0,
                        prediction = %record.prediction,
                        "Save"
                    ),
                    Err(error) => tracing::warn!(
                        target: "diawell_store",
                        error = %error,
                        "Save failed"
                    ),
                }
                let _ = reply.send(result);
            }
            StoreRequest::ListAll { reply } => {
                let result = store.list_all();
                match &result {
                    Ok(records) => tracing::debug!(
                        target: "diawell_store",
                        count = records.len(),
                        "ListAll"
                    ),
                    Err(error) => tracing::warn!(
                        target: "diawell_store",
                        error = %error,
                        "ListAll failed"
                    ),
                }
                let _ = reply.send(result);
            }
            StoreRequest::Shutdown { reply } => {
                tracing::info!(target: "diawell_store", "Shutdown - exiting service loop");
                let _ = reply.send(Ok(()));
                break;
            }
        }
    }

    tracing::info!(target: "diawell_store", "service loop exited");
}
