pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use config::{CorsConfig, PhenotypeConfig};
use services::{LabelAlignment, PhenotypePredictor, TreePipeline};

#[derive(Clone)]
pub struct AppState {
    pub config: PhenotypeConfig,
    pub predictor: PhenotypePredictor,
}

impl AppState {
    /// Load the model artifact and check it against the label table.
    pub async fn from_config(config: PhenotypeConfig) -> Result<Self, AppError> {
        let pipeline = TreePipeline::load(&config.model.path).await.map_err(|e| {
            tracing::error!(path = %config.model.path.display(), error = %e, "Failed to load model");
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        let predictor = PhenotypePredictor::new(Arc::new(pipeline));
        let info = predictor.model_info();
        tracing::info!(
            path = %config.model.path.display(),
            name = ?info.name,
            sha256 = %info.sha256,
            trees = info.tree_count,
            labels = ?predictor.labels(),
            "Model loaded"
        );

        match predictor.check_label_alignment() {
            LabelAlignment::Aligned => {
                tracing::info!(classes = ?info.classes, "Model classes match phenotype labels");
            }
            LabelAlignment::Unrecorded => {
                tracing::warn!("Model artifact records no classes; assuming positional label alignment");
            }
            LabelAlignment::Mismatch { expected, found } => {
                if config.model.strict_classes {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "Model classes {:?} do not match phenotype label indices {:?}",
                        found,
                        expected
                    )));
                }
                tracing::warn!(
                    expected = ?expected,
                    found = ?found,
                    "Model classes do not match phenotype label indices; predictions may be mislabelled"
                );
            }
        }

        Ok(Self { config, predictor })
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(handlers::read_root))
        .route("/class_labels", get(handlers::prediction::class_labels))
        .route("/predict", post(handlers::prediction::predict))
        .route("/model_info", get(handlers::prediction::model_info))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// A wildcard origin mirrors the caller's origin, method and headers, which
/// is what allows credentials alongside "any origin".
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(config.allowed_origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
