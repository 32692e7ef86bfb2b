use std::sync::Arc;

use tracing::info;
use vision::GeminiClient;

use super::{
    analysis::{Analyzer, AnalyzerSettings},
    config::Config,
    error::AppError,
};

pub struct State {
    pub config: Config,
    pub analyzer: Analyzer,
}

impl State {
    pub fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load()?;

        let gemini = Arc::new(
            GeminiClient::new(config.gemini())
                .map_err(|e| AppError::InternalError(Box::new(e)))?,
        );
        info!(
            "Using model {} for classification and remarks, measuring {}",
            config.gemini_model, config.metric_mode
        );

        let analyzer = Analyzer::new(
            AnalyzerSettings {
                mode: config.metric_mode,
                timeout: config.model_timeout,
                expert_threshold: config.expert_threshold,
            },
            gemini.clone(),
            gemini,
        );

        Ok(Arc::new(Self { config, analyzer }))
    }
}
