//! Model loading and inference.
//!
//! `Classifier` is the seam handlers and the predictor depend on;
//! `TreePipeline` is the artifact-backed implementation.

pub mod artifact;
pub mod booster;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use error::{ArtifactError, InferenceError};
pub use frame::FeatureFrame;
pub use pipeline::TreePipeline;

use serde::Serialize;

pub trait Classifier: Send + Sync {
    /// One probability vector per frame row, in `classes()` order.
    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<Vec<f32>>, InferenceError>;

    /// Class value for each output position.
    fn classes(&self) -> &[i64];

    /// Classes as recorded by the trainer, if it recorded any.
    fn recorded_classes(&self) -> Option<&[i64]>;

    fn describe(&self) -> ModelInfo;

    /// Most probable class value per row.
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, InferenceError> {
        self.predict_proba(frame)?
            .iter()
            .map(|proba| {
                booster::argmax(proba)
                    .and_then(|best| self.classes().get(best).copied())
                    .ok_or(InferenceError::EmptyOutput)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: Option<String>,
    pub format_version: u32,
    pub num_class: usize,
    pub classes: Vec<i64>,
    pub features: Vec<String>,
    pub tree_count: usize,
    pub sha256: String,
}
