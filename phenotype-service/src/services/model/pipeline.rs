use super::artifact::{FeatureKind, FeatureSpec, ModelArtifact};
use super::booster::{softmax, TreeEnsemble};
use super::error::{ArtifactError, InferenceError};
use super::frame::{Cell, FeatureFrame};
use super::{Classifier, ModelInfo};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Preprocessor and booster loaded from one artifact.
#[derive(Debug, Clone)]
pub struct TreePipeline {
    name: Option<String>,
    format_version: u32,
    features: Vec<FeatureSpec>,
    classes: Vec<i64>,
    recorded_classes: Option<Vec<i64>>,
    ensemble: TreeEnsemble,
    sha256: String,
}

impl TreePipeline {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact = ModelArtifact::from_slice(bytes)?;
        let sha256 = hex::encode(Sha256::digest(bytes));

        Ok(Self {
            name: artifact.name.clone(),
            format_version: artifact.format_version,
            classes: artifact.resolved_classes(),
            ensemble: TreeEnsemble::from_spec(&artifact.booster),
            recorded_classes: artifact.classes,
            features: artifact.features,
            sha256,
        })
    }

    fn encode_row(
        &self,
        frame: &FeatureFrame,
        row: usize,
    ) -> Result<Vec<Option<f32>>, InferenceError> {
        self.features
            .iter()
            .map(|feature| {
                let cell = frame
                    .cell(row, &feature.name)
                    .ok_or_else(|| InferenceError::MissingColumn(feature.name.clone()))?;
                encode_cell(feature, cell)
            })
            .collect()
    }
}

fn encode_cell(feature: &FeatureSpec, cell: &Cell) -> Result<Option<f32>, InferenceError> {
    match &feature.kind {
        FeatureKind::Numeric => match cell {
            Cell::Integer(i) => Ok(Some(*i as f32)),
            Cell::Float(f) => Ok(Some(*f as f32)),
            Cell::Missing => Ok(None),
            Cell::Text(_) => Err(InferenceError::NotNumeric {
                column: feature.name.clone(),
                found: cell.kind(),
            }),
        },
        FeatureKind::Categorical { categories } => {
            let position = match cell {
                Cell::Text(s) => categories.iter().position(|c| c == s),
                Cell::Integer(i) => {
                    let s = i.to_string();
                    categories.iter().position(|c| *c == s)
                }
                Cell::Float(f) => {
                    let s = f.to_string();
                    categories.iter().position(|c| *c == s)
                }
                Cell::Missing => None,
            };
            Ok(position.map(|p| p as f32))
        }
    }
}

impl Classifier for TreePipeline {
    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<Vec<f32>>, InferenceError> {
        (0..frame.len())
            .map(|row| {
                let encoded = self.encode_row(frame, row)?;
                Ok(softmax(&self.ensemble.margins(&encoded)))
            })
            .collect()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn recorded_classes(&self) -> Option<&[i64]> {
        self.recorded_classes.as_deref()
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.clone(),
            format_version: self.format_version,
            classes: self.classes.clone(),
            features: self.features.iter().map(|f| f.name.clone()).collect(),
            tree_count: self.ensemble.tree_count(),
            num_class: self.ensemble.num_class(),
            sha256: self.sha256.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Class 1 when `Gene == "MYH7"`, class 0 otherwise; `Position` below
    /// 100 adds weight to class 0.
    fn pipeline(classes: Option<Vec<i64>>) -> TreePipeline {
        let mut artifact = json!({
            "format_version": 1,
            "name": "unit",
            "features": [
                { "name": "Gene", "kind": "categorical", "categories": ["BRCA1", "MYH7"] },
                { "name": "Position", "kind": "numeric" }
            ],
            "booster": {
                "num_class": 2,
                "trees": [
                    { "nodes": [
                        { "feature": 1, "threshold": 100.0, "yes": 1, "no": 2, "missing": 2 },
                        { "leaf": 0.5 },
                        { "leaf": 0.0 }
                    ] },
                    { "nodes": [
                        { "feature": 0, "threshold": 0.5, "yes": 1, "no": 2, "missing": 1 },
                        { "leaf": -1.0 },
                        { "leaf": 2.0 }
                    ] }
                ]
            }
        });
        if let Some(classes) = classes {
            artifact["classes"] = json!(classes);
        }
        TreePipeline::from_bytes(&serde_json::to_vec(&artifact).unwrap()).unwrap()
    }

    fn frame(gene: serde_json::Value, position: serde_json::Value) -> FeatureFrame {
        FeatureFrame::from_record(&json!({ "Gene": gene, "Position": position })).unwrap()
    }

    #[test]
    fn predicts_class_from_category() {
        let model = pipeline(None);
        assert_eq!(model.predict(&frame(json!("MYH7"), json!(500))).unwrap(), vec![1]);
        assert_eq!(model.predict(&frame(json!("BRCA1"), json!(500))).unwrap(), vec![0]);
    }

    #[test]
    fn unseen_category_is_treated_as_missing() {
        let model = pipeline(None);
        assert_eq!(model.predict(&frame(json!("TP53"), json!(5))).unwrap(), vec![0]);
    }

    #[test]
    fn maps_argmax_through_recorded_classes() {
        let model = pipeline(Some(vec![7, 9]));
        assert_eq!(model.predict(&frame(json!("MYH7"), json!(500))).unwrap(), vec![9]);
        assert_eq!(model.recorded_classes(), Some(&[7, 9][..]));
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = pipeline(None);
        let proba = model.predict_proba(&frame(json!("MYH7"), json!(5))).unwrap();
        let total: f32 = proba[0].iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_column_is_an_error() {
        let model = pipeline(None);
        let frame = FeatureFrame::from_record(&json!({ "Gene": "MYH7" })).unwrap();
        let err = model.predict(&frame).unwrap_err();
        assert!(matches!(err, InferenceError::MissingColumn(ref c) if c == "Position"));
    }

    #[test]
    fn text_in_numeric_column_is_an_error() {
        let model = pipeline(None);
        let err = model
            .predict(&frame(json!("MYH7"), json!("far away")))
            .unwrap_err();
        assert!(matches!(err, InferenceError::NotNumeric { .. }));
    }

    #[test]
    fn describe_reports_fingerprint_and_shape() {
        let info = pipeline(None).describe();
        assert_eq!(info.sha256.len(), 64);
        assert_eq!(info.tree_count, 2);
        assert_eq!(info.features, vec!["Gene", "Position"]);
        assert_eq!(info.classes, vec![0, 1]);
    }
}
