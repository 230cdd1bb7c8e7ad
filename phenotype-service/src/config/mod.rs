use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_MODEL_PATH: &str = "models/phenotype_model.json";

#[derive(Debug, Clone, Deserialize)]
pub struct PhenotypeConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub environment: Environment,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub model: ModelConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Refuse to start when the artifact's classes disagree with the label table.
    pub strict_classes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// `["*"]` mirrors any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl PhenotypeConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") => Environment::Prod,
            _ => Environment::Dev,
        };
        let is_prod = environment == Environment::Prod;

        Ok(PhenotypeConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("phenotype-service"), is_prod)?,
            environment,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            model: ModelConfig {
                path: PathBuf::from(get_env("MODEL_PATH", Some(DEFAULT_MODEL_PATH), is_prod)?),
                strict_classes: parse_bool(
                    "MODEL_STRICT_CLASSES",
                    &get_env("MODEL_STRICT_CLASSES", Some("false"), is_prod)?,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(
                    "CORS_ALLOWED_ORIGINS",
                    &get_env("CORS_ALLOWED_ORIGINS", Some("*"), is_prod)?,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a boolean, got '{}'",
            key,
            other
        ))),
    }
}

/// Comma-separated origins. At least one is required.
fn parse_origins(key: &str, value: &str) -> Result<Vec<String>, AppError> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must list at least one origin (use '*' for any)",
            key
        )));
    }
    Ok(origins)
}
