use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::record::{PatientRecord, RecordId, StoredRecord};
use crate::StoreError;

/// Persistence capability the request path depends on.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, record: PatientRecord) -> Result<RecordId, StoreError>;

    /// Every record, most recent first.
    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError>;
}

#[derive(Debug)]
pub enum StoreRequest {
    Save {
        record: PatientRecord,
        reply: oneshot::Sender<Result<RecordId, StoreError>>,
    },
    ListAll {
        reply: oneshot::Sender<Result<Vec<StoredRecord>, StoreError>>,
    },
    Shutdown {
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
}

/// Cloneable sender side of the store service loop.
#[derive(Clone, Debug)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreRequest>,
}

impl StoreHandle {
    pub fn new(tx: mpsc::UnboundedSender<StoreRequest>) -> Self {
        Self { tx }
    }

    async fn round_trip<T, F>(&self, build_request: F) -> Result<T, StoreError>
    where
        F: FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build_request(reply_tx))
            .map_err(|_| StoreError::Closed)?;
        reply_rx.await.map_err(|_| StoreError::Closed)?
    }

    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.round_trip(|reply| StoreRequest::Shutdown { reply })
            .await
    }
}

#[async_trait]
impl RecordStore for StoreHandle {
    async fn save(&self, record: PatientRecord) -> Result<RecordId, StoreError> {
        self.round_trip(|reply| StoreRequest::Save { record, reply })
            .await
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        self.round_trip(|reply| StoreRequest::ListAll { reply })
            .await
    }
}
