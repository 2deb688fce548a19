use std::sync::Arc;

use anyhow::{Context, Result};
use diawell_model::{Classifier, LogisticModel, ModelInfo};
use diawell_scoring::{AssessError, Assessment, Assessor, RawInput, RiskLabel};
use diawell_store::{PatientInputs, PatientRecord, RecordId, RecordStore, SqliteStore, StoreError, StoreHandle};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Assess(#[from] AssessError),
    #[error("failed to save record: {0}")]
    Store(#[from] StoreError),
}

/// What the result page shows for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentView {
    /// `None` when the submission was not persisted.
    pub id: Option<RecordId>,
    pub name: String,
    pub result: RiskLabel,
    /// Rounded to 4 decimal places for display.
    pub probability: f64,
    pub inputs: PatientInputs,
}

impl AssessmentView {
    pub fn new(id: Option<RecordId>, assessment: &Assessment) -> Self {
        Self {
            id,
            name: assessment.name.clone(),
            result: assessment.verdict.label,
            probability: round_to(assessment.verdict.probability, 4),
            inputs: PatientInputs::from(&assessment.features),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Request-independent state shared by every connection.
pub struct App {
    assessor: Assessor,
    model_info: Option<ModelInfo>,
    store: Arc<dyn RecordStore>,
    expose_model_info: bool,
}

impl App {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        model_info: Option<ModelInfo>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            assessor: Assessor::new(classifier),
            model_info,
            store,
            expose_model_info: true,
        }
    }

    pub fn with_model_info_exposed(mut self, expose: bool) -> Self {
        self.expose_model_info = expose;
        self
    }

    /// Model parameters, if the classifier reports them and exposure is on.
    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref().filter(|_| self.expose_model_info)
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Normalizes, scores and (when `persist`) saves one submission.
    pub async fn submit(&self, raw: &RawInput, persist: bool) -> Result<AssessmentView, SubmitError> {
        let assessment = self.assessor.assess(raw)?;
        let id = if persist {
            let record = PatientRecord::new(
                assessment.name.clone(),
                &assessment.features,
                assessment.verdict.probability,
                assessment.verdict.label.as_str(),
            );
            Some(self.store.save(record).await?)
        } else {
            None
        };
        Ok(AssessmentView::new(id, &assessment))
    }
}

/// Reads the model artifact. Any failure here must stop the process.
pub fn load_classifier(config: &AppConfig) -> Result<LogisticModel> {
    LogisticModel::load(&config.model.path).with_context(|| {
        format!(
            "failed to load classifier from {}",
            config.model.path.display()
        )
    })
}

/// Opens the case log and starts its service loop.
pub fn open_store(config: &AppConfig) -> Result<(StoreHandle, JoinHandle<()>)> {
    let store = SqliteStore::open(&config.store.path)
        .with_context(|| format!("failed to open store {}", config.store.path.display()))?;
    Ok(diawell_store::service::spawn(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_rounded_for_display() {
        assert_eq!(round_to(0.817_574_476, 4), 0.8176);
        assert_eq!(round_to(0.5, 4), 0.5);
        assert_eq!(round_to(0.000_04, 4), 0.0);
    }
}
