use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use service_core::error::AppError;
use std::sync::{Mutex, OnceLock};

static INIT_LOCK: Mutex<()> = Mutex::new(());
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static PREDICTION_METRICS: OnceLock<PredictionMetrics> = OnceLock::new();

struct PredictionMetrics {
    registry: Registry,
    predictions_total: IntCounterVec,
}

/// Install the global `metrics` recorder backing the HTTP middleware.
/// Safe to call more than once, including from several threads at a time.
pub fn init_metrics() -> Result<(), AppError> {
    // Held across check and install so only one caller reaches the recorder.
    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))
    })?;
    let _ = METRICS_HANDLE.set(handle);

    prediction_metrics();
    Ok(())
}

fn prediction_metrics() -> &'static PredictionMetrics {
    PREDICTION_METRICS.get_or_init(|| {
        let registry = Registry::new();

        let predictions_total = IntCounterVec::new(
            Opts::new(
                "phenotype_predictions_total",
                "Total phenotype predictions by outcome",
            ),
            &["outcome"],
        )
        .expect("Failed to create phenotype_predictions_total metric");

        registry
            .register(Box::new(predictions_total.clone()))
            .expect("Failed to register phenotype_predictions_total");

        PredictionMetrics {
            registry,
            predictions_total,
        }
    })
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prediction_metrics().registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    if let Ok(custom_metrics) = String::from_utf8(buffer) {
        output.push_str(&custom_metrics);
    }

    output
}

/// Count one prediction outcome: `known`, `unknown` or `error`.
pub fn record_prediction(outcome: &str) {
    prediction_metrics()
        .predictions_total
        .with_label_values(&[outcome])
        .inc();
}
