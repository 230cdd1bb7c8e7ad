use crate::dtos::VariantRecord;
use crate::models::{Prediction, PHENOTYPE_NAMES};
use crate::services::model::{Classifier, FeatureFrame, InferenceError, ModelInfo};
use std::sync::Arc;

/// Turns variant records into phenotype predictions using a shared,
/// read-only classifier.
#[derive(Clone)]
pub struct PhenotypePredictor {
    model: Arc<dyn Classifier>,
}

/// How the model's recorded classes line up with the label table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelAlignment {
    Aligned,
    Unrecorded,
    Mismatch { expected: Vec<i64>, found: Vec<i64> },
}

impl PhenotypePredictor {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        &PHENOTYPE_NAMES
    }

    pub fn model_info(&self) -> ModelInfo {
        self.model.describe()
    }

    pub fn predict(&self, record: &VariantRecord) -> Result<Prediction, InferenceError> {
        let frame = FeatureFrame::from_record(record)?;
        let index = self
            .model
            .predict(&frame)?
            .first()
            .copied()
            .ok_or(InferenceError::EmptyOutput)?;

        tracing::debug!(index, "Raw prediction index");

        Ok(Prediction::from_index(index))
    }

    pub fn check_label_alignment(&self) -> LabelAlignment {
        let expected: Vec<i64> = (0..PHENOTYPE_NAMES.len() as i64).collect();
        match self.model.recorded_classes() {
            None => LabelAlignment::Unrecorded,
            Some(found) if found == expected.as_slice() => LabelAlignment::Aligned,
            Some(found) => LabelAlignment::Mismatch {
                expected,
                found: found.to_vec(),
            },
        }
    }
}
