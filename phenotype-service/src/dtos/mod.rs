//! Request and response bodies.

use crate::models::phenotype::PREDICTION_ERROR_LABEL;
use serde::{Deserialize, Serialize};

/// One genomic variant. Every field is required; values are not range- or
/// enum-checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariantRecord {
    #[serde(rename = "Type")]
    pub variant_type: String,
    #[serde(rename = "GeneSymbol")]
    pub gene_symbol: String,
    #[serde(rename = "HGNC_ID")]
    pub hgnc_id: String,
    #[serde(rename = "Assembly")]
    pub assembly: String,
    #[serde(rename = "ChromosomeAccession")]
    pub chromosome_accession: String,
    #[serde(rename = "Chromosome")]
    pub chromosome: String,
    #[serde(rename = "Cytogenetic")]
    pub cytogenetic: String,
    #[serde(rename = "PositionVCF")]
    pub position_vcf: i64,
    #[serde(rename = "ReferenceAlleleVCF")]
    pub reference_allele_vcf: String,
    #[serde(rename = "AlternateAlleleVCF")]
    pub alternate_allele_vcf: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub predicted_phenotype: String,
}

impl PredictionResponse {
    pub fn success(predicted_phenotype: String) -> Self {
        Self {
            error: None,
            predicted_phenotype,
        }
    }

    pub fn failure(reason: impl std::fmt::Display) -> Self {
        Self {
            error: Some(format!("Prediction failed: {}", reason)),
            predicted_phenotype: PREDICTION_ERROR_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ClassLabelsResponse {
    pub class_labels: Vec<String>,
}
