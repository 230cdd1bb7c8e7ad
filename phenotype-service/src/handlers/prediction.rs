use crate::dtos::{ClassLabelsResponse, PredictionResponse, VariantRecord};
use crate::services::metrics;
use crate::services::model::ModelInfo;
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /predict
///
/// Inference failures come back as the error envelope with a 500 status;
/// body rejections never reach this handler.
#[tracing::instrument(skip(state, record))]
pub async fn predict(
    State(state): State<AppState>,
    ValidatedJson(record): ValidatedJson<VariantRecord>,
) -> (StatusCode, Json<PredictionResponse>) {
    match state.predictor.predict(&record) {
        Ok(prediction) => {
            let label = prediction.label();
            tracing::info!(
                gene = %record.gene_symbol,
                index = prediction.index(),
                phenotype = %label,
                "Final phenotype"
            );
            metrics::record_prediction(prediction.outcome());
            (StatusCode::OK, Json(PredictionResponse::success(label)))
        }
        Err(e) => {
            tracing::error!(gene = %record.gene_symbol, error = %e, "Error in prediction");
            metrics::record_prediction("error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PredictionResponse::failure(e)),
            )
        }
    }
}

/// GET /class_labels
pub async fn class_labels(State(state): State<AppState>) -> Json<ClassLabelsResponse> {
    Json(ClassLabelsResponse {
        class_labels: state
            .predictor
            .labels()
            .iter()
            .map(|label| label.to_string())
            .collect(),
    })
}

/// GET /model_info
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.predictor.model_info())
}
