//! On-disk model format: a column preprocessor plus a gradient-boosted tree
//! ensemble, serialised as JSON by the offline training job.

use super::error::ArtifactError;
use serde::{Deserialize, Serialize};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Class values in output order, as recorded by the trainer.
    #[serde(default)]
    pub classes: Option<Vec<i64>>,
    pub features: Vec<FeatureSpec>,
    pub booster: BoosterSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    /// Ordinal encoding: the position in `categories`. Unseen values encode
    /// as missing.
    Categorical { categories: Vec<String> },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoosterSpec {
    pub num_class: usize,
    #[serde(default)]
    pub base_score: f32,
    pub trees: Vec<TreeSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeSpec {
    /// Defaults to `tree index % num_class`.
    #[serde(default)]
    pub class_id: Option<usize>,
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        #[serde(default)]
        missing: Option<usize>,
    },
    Leaf {
        leaf: f32,
    },
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Recorded classes, or `0..num_class` when the trainer recorded none.
    pub fn resolved_classes(&self) -> Vec<i64> {
        match &self.classes {
            Some(classes) => classes.clone(),
            None => (0..self.booster.num_class as i64).collect(),
        }
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(invalid(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        let num_class = self.booster.num_class;
        if num_class < 2 {
            return Err(invalid(format!(
                "num_class must be at least 2, got {}",
                num_class
            )));
        }

        match &self.classes {
            Some(classes) if classes.len() != num_class => {
                return Err(invalid(format!(
                    "{} classes recorded but booster has num_class {}",
                    classes.len(),
                    num_class
                )));
            }
            _ => {}
        }

        for feature in &self.features {
            if matches!(&feature.kind, FeatureKind::Categorical { categories } if categories.is_empty()) {
                return Err(invalid(format!(
                    "categorical feature '{}' has no categories",
                    feature.name
                )));
            }
        }

        if self.booster.trees.is_empty() {
            return Err(invalid("booster has no trees".to_string()));
        }

        for (t, tree) in self.booster.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(invalid(format!("tree {} has no nodes", t)));
            }
            match tree.class_id {
                Some(class_id) if class_id >= num_class => {
                    return Err(invalid(format!(
                        "tree {} targets class {} but num_class is {}",
                        t, class_id, num_class
                    )));
                }
                _ => {}
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                let NodeSpec::Split {
                    feature,
                    yes,
                    no,
                    missing,
                    ..
                } = node
                else {
                    continue;
                };
                if *feature >= self.features.len() {
                    return Err(invalid(format!(
                        "tree {} node {} splits on unknown feature {}",
                        t, n, feature
                    )));
                }
                // Children must come after their parent, which also rules out cycles.
                for child in [Some(*yes), Some(*no), *missing].into_iter().flatten() {
                    if child <= n || child >= tree.nodes.len() {
                        return Err(invalid(format!(
                            "tree {} node {} has invalid child {}",
                            t, n, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> ArtifactError {
    ArtifactError::Invalid(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact_json() -> serde_json::Value {
        json!({
            "format_version": 1,
            "name": "toy",
            "features": [
                { "name": "GeneSymbol", "kind": "categorical", "categories": ["BRCA1", "MYH7"] },
                { "name": "PositionVCF", "kind": "numeric" }
            ],
            "booster": {
                "num_class": 2,
                "trees": [
                    { "nodes": [
                        { "feature": 0, "threshold": 0.5, "yes": 1, "no": 2, "missing": 1 },
                        { "leaf": 1.0 },
                        { "leaf": -1.0 }
                    ] },
                    { "nodes": [ { "leaf": 0.0 } ] }
                ]
            }
        })
    }

    fn parse(value: serde_json::Value) -> Result<ModelArtifact, ArtifactError> {
        ModelArtifact::from_slice(&serde_json::to_vec(&value).unwrap())
    }

    #[test]
    fn parses_feature_kinds_and_nodes() {
        let artifact = parse(artifact_json()).unwrap();

        assert_eq!(artifact.features[1].kind, FeatureKind::Numeric);
        assert!(matches!(
            artifact.features[0].kind,
            FeatureKind::Categorical { ref categories } if categories.len() == 2
        ));
        assert_eq!(artifact.booster.trees[0].nodes[1], NodeSpec::Leaf { leaf: 1.0 });
        assert_eq!(artifact.resolved_classes(), vec![0, 1]);
    }

    #[test]
    fn rejects_unknown_format_version() {
        let mut value = artifact_json();
        value["format_version"] = json!(2);
        assert!(matches!(parse(value), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn rejects_class_count_mismatch() {
        let mut value = artifact_json();
        value["classes"] = json!([0, 1, 2]);
        assert!(matches!(parse(value), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn rejects_backward_child_reference() {
        let mut value = artifact_json();
        value["booster"]["trees"][0]["nodes"][0]["no"] = json!(0);
        assert!(matches!(parse(value), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn rejects_split_on_unknown_feature() {
        let mut value = artifact_json();
        value["booster"]["trees"][0]["nodes"][0]["feature"] = json!(7);
        assert!(matches!(parse(value), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ModelArtifact::from_slice(b"{ not json").unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }
}
