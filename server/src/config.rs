use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use snacks::{DEFAULT_EXPERT_THRESHOLD, MetricMode};
use tracing::{info, warn};
use vision::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};

use crate::error::AppError;

pub struct Config {
    pub port: u16,
    pub metric_mode: MetricMode,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub model_timeout: Duration,
    pub expert_threshold: f64,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            metric_mode: try_load("SNACK_METRIC", "area")?,
            gemini_api_key: read_secret("GEMINI_API_KEY")?,
            gemini_model: try_load("GEMINI_MODEL", DEFAULT_MODEL)?,
            gemini_base_url: try_load("GEMINI_BASE_URL", DEFAULT_BASE_URL)?,
            model_timeout: model_timeout(try_load("MODEL_TIMEOUT_SECS", "30")?)?,
            expert_threshold: expert_threshold(try_load(
                "EXPERT_THRESHOLD",
                &DEFAULT_EXPERT_THRESHOLD.to_string(),
            )?)?,
            max_body_bytes: try_load("MAX_BODY_BYTES", "10485760")?,
        })
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: self.model_timeout,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("{key}: {e}"))
        })
}

fn model_timeout(secs: u64) -> Result<Duration, AppError> {
    if secs == 0 {
        warn!("Invalid MODEL_TIMEOUT_SECS value: 0");
        return Err(AppError::Config("MODEL_TIMEOUT_SECS: must be at least 1".to_string()));
    }

    Ok(Duration::from_secs(secs))
}

fn expert_threshold(threshold: f64) -> Result<f64, AppError> {
    if !threshold.is_finite() || threshold < 0.0 {
        warn!("Invalid EXPERT_THRESHOLD value: {threshold}");
        return Err(AppError::Config(format!(
            "EXPERT_THRESHOLD: must be a finite, non-negative number, got {threshold}"
        )));
    }

    Ok(threshold)
}

/// Environment first, then a docker secret file.
fn read_secret(secret_name: &str) -> Result<String, AppError> {
    if let Some(value) = var(secret_name).filter(|v| !v.trim().is_empty()) {
        return Ok(value.trim().to_string());
    }

    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
            AppError::Config(format!("{secret_name} is not set and {path} is unreadable"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_timeout() {
        assert_eq!(model_timeout(30).unwrap(), Duration::from_secs(30));
        assert!(matches!(model_timeout(0), Err(AppError::Config(_))));
    }

    #[test]
    fn test_expert_threshold() {
        assert_eq!(expert_threshold(100.0).unwrap(), 100.0);
        assert_eq!(expert_threshold(0.0).unwrap(), 0.0);

        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(expert_threshold(bad), Err(AppError::Config(_))));
        }
    }

    #[test]
    fn test_threshold_parse_then_validate() {
        let parsed: f64 = "NaN".parse().unwrap();
        assert!(expert_threshold(parsed).is_err());
    }
}
