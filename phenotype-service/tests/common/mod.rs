#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use phenotype_service::config::{CorsConfig, Environment, ModelConfig, PhenotypeConfig};
use phenotype_service::{build_router, AppState};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tower::util::ServiceExt;

pub const LABELS: [&str; 5] = [
    "Cardiovascular phenotype",
    "Developmental and epileptic encephalopathy",
    "Fanconi anemia",
    "Hereditary cancer-predisposing syndrome",
    "Inborn genetic diseases",
];

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/phenotype_model.json")
}

pub fn test_config(model_path: &Path) -> PhenotypeConfig {
    PhenotypeConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        service_name: "phenotype-service-test".to_string(),
        environment: Environment::Dev,
        log_level: "error".to_string(),
        otlp_endpoint: None,
        model: ModelConfig {
            path: model_path.to_path_buf(),
            strict_classes: false,
        },
        cors: CorsConfig::default(),
    }
}

pub async fn router_for(model_path: &Path) -> Router {
    let state = AppState::from_config(test_config(model_path))
        .await
        .expect("Failed to build application state");
    build_router(state)
}

/// Keep the returned handle alive until the model has been loaded.
pub fn write_artifact(artifact: &Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(&serde_json::to_vec(artifact).unwrap())
        .expect("Failed to write artifact");
    file
}

/// Six classes where class 5 always wins: one past the label table.
pub fn six_class_artifact() -> Value {
    json!({
        "format_version": 1,
        "classes": [0, 1, 2, 3, 4, 5],
        "features": [{ "name": "GeneSymbol", "kind": "categorical", "categories": ["BRCA1"] }],
        "booster": {
            "num_class": 6,
            "trees": [{ "class_id": 5, "nodes": [{ "leaf": 3.0 }] }]
        }
    })
}

pub fn brca1_record() -> Value {
    json!({
        "Type": "SNV",
        "GeneSymbol": "BRCA1",
        "HGNC_ID": "1100",
        "Assembly": "GRCh38",
        "ChromosomeAccession": "NC_000017.11",
        "Chromosome": "17",
        "Cytogenetic": "17q21.31",
        "PositionVCF": 43044295,
        "ReferenceAlleleVCF": "G",
        "AlternateAlleleVCF": "A"
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, headers, body)
}
