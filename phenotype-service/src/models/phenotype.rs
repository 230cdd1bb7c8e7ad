//! Phenotype label table and class-index resolution.

/// Human-readable names, positionally aligned with the model's class indices.
pub const PHENOTYPE_NAMES: [&str; 5] = [
    "Cardiovascular phenotype",
    "Developmental and epileptic encephalopathy",
    "Fanconi anemia",
    "Hereditary cancer-predisposing syndrome",
    "Inborn genetic diseases",
];

/// Label returned in place of a phenotype when inference fails.
pub const PREDICTION_ERROR_LABEL: &str = "Error in prediction";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    Known { index: i64, label: &'static str },
    Unknown { index: i64 },
}

impl Prediction {
    pub fn from_index(index: i64) -> Self {
        match usize::try_from(index).ok().and_then(|i| PHENOTYPE_NAMES.get(i)) {
            Some(label) => Prediction::Known {
                index,
                label: *label,
            },
            None => Prediction::Unknown { index },
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            Prediction::Known { index, .. } | Prediction::Unknown { index } => *index,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Prediction::Known { label, .. } => (*label).to_string(),
            Prediction::Unknown { index } => format!("Unknown phenotype (index: {})", index),
        }
    }

    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Prediction::Known { .. } => "known",
            Prediction::Unknown { .. } => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_indices_resolve_to_labels() {
        for (i, name) in PHENOTYPE_NAMES.iter().enumerate() {
            let prediction = Prediction::from_index(i as i64);
            assert_eq!(prediction.label(), *name);
            assert_eq!(prediction.outcome(), "known");
        }
    }

    #[test]
    fn out_of_range_indices_fall_back() {
        assert_eq!(
            Prediction::from_index(5).label(),
            "Unknown phenotype (index: 5)"
        );
        assert_eq!(
            Prediction::from_index(-1).label(),
            "Unknown phenotype (index: -1)"
        );
        assert_eq!(Prediction::from_index(-1).outcome(), "unknown");
    }
}
