use super::artifact::{BoosterSpec, NodeSpec};

/// Gradient-boosted trees grouped by output class.
///
/// Each class margin is `base_score` plus the leaf reached in every tree
/// assigned to that class. Splits send `value < threshold` to `yes`.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    num_class: usize,
    base_score: f32,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone)]
struct Tree {
    class_id: usize,
    nodes: Vec<NodeSpec>,
}

impl TreeEnsemble {
    /// Expects a `BoosterSpec` that already passed artifact validation.
    pub fn from_spec(spec: &BoosterSpec) -> Self {
        let trees = spec
            .trees
            .iter()
            .enumerate()
            .map(|(i, tree)| Tree {
                class_id: tree.class_id.unwrap_or(i % spec.num_class),
                nodes: tree.nodes.clone(),
            })
            .collect();

        Self {
            num_class: spec.num_class,
            base_score: spec.base_score,
            trees,
        }
    }

    pub fn num_class(&self) -> usize {
        self.num_class
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Raw per-class scores for one encoded row. `None` marks a missing value.
    pub fn margins(&self, row: &[Option<f32>]) -> Vec<f32> {
        let mut margins = vec![self.base_score; self.num_class];
        for tree in &self.trees {
            margins[tree.class_id] += tree.leaf_value(row);
        }
        margins
    }
}

impl Tree {
    fn leaf_value(&self, row: &[Option<f32>]) -> f32 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                NodeSpec::Leaf { leaf } => return *leaf,
                NodeSpec::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    idx = match row.get(*feature).copied().flatten() {
                        Some(value) if !value.is_nan() => {
                            if value < *threshold {
                                *yes
                            } else {
                                *no
                            }
                        }
                        _ => missing.unwrap_or(*yes),
                    };
                }
            }
        }
    }
}

/// Numerically stable softmax.
pub fn softmax(margins: &[f32]) -> Vec<f32> {
    let max = margins.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = margins.iter().map(|m| (m - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum, matching numpy's `argmax`.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
