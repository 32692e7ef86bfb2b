//! # Vision
//!
//! Client for the multimodal model that looks at snack photos.
//!
//! ## Collaborators
//!
//! Two roles, each behind a trait so the server can be driven by fakes in tests:
//! - [`Classifier`]: image in, [`RawDimensionEstimate`] out (snack type plus nullable measurements)
//! - [`Remarker`]: sizes in, one witty sentence out
//!
//! [`GeminiClient`] plays both against the Gemini `generateContent` REST endpoint, asking for
//! JSON that follows a response schema so the output deserializes straight into our models.
//!
//! ## Notes
//! - No retries. A failure is final for that request.
//! - Every request is bounded by the client timeout.
//! - Non-success statuses are kept as structured [`VisionError::Status`] so callers can spot
//!   quota exhaustion without reading error text.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod utils;

pub use error::VisionError;
pub use image::{ImagePayload, PayloadError};
pub use models::{RawDimensionEstimate, RemarkRequest};

use models::{RemarkOutput, Response};
use prompts::{dimensions_prompt, remark_prompt};
use utils::{build_dimensions_payload, build_remark_payload, endpoint};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &ImagePayload) -> Result<RawDimensionEstimate, VisionError>;
}

#[async_trait]
pub trait Remarker: Send + Sync {
    async fn remark(&self, request: &RemarkRequest) -> Result<String, VisionError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, VisionError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint(&config.base_url, &config.model),
            api_key: config.api_key,
        })
    }

    async fn generate<T: DeserializeOwned + Send>(&self, payload: &Value) -> Result<T, VisionError> {
        let res = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(payload)
            .send()
            .await?;

        let status = res.status();
        debug!("Model responded with {status}");

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("Model request failed with {status}");

            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: Response = res.json().await?;
        let text = response.text().ok_or(VisionError::EmptyResponse)?;

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Classifier for GeminiClient {
    async fn classify(&self, image: &ImagePayload) -> Result<RawDimensionEstimate, VisionError> {
        let payload = build_dimensions_payload(&dimensions_prompt(), image);

        self.generate(&payload).await
    }
}

#[async_trait]
impl Remarker for GeminiClient {
    async fn remark(&self, request: &RemarkRequest) -> Result<String, VisionError> {
        let payload = build_remark_payload(&remark_prompt(request));
        let output: RemarkOutput = self.generate(&payload).await?;

        Ok(output.comment)
    }
}
