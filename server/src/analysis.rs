//! # Analysis
//!
//! Takes a snack photo from upload to leaderboard.
//!
//! ## Flow
//!
//! 1. Validate the payload
//! 2. Ask the classifier for a snack type and dimensions
//! 3. Compute the metric
//! 4. Compare against the current record, then append, both under one lock
//! 5. Ask for a remark (advisory, never affects the outcome)
//!
//! ## Failure Shape
//!
//! [`Analyzer::analyze`] never returns an error. Every path ends in the same
//! [`AnalysisResult`], with `error` set on failure and the current winners always attached so
//! the leaderboard stays live on the client.
//!
//! ## Concurrency
//!
//! The store lock is held across "read the record, decide, append", so two equal snacks
//! submitted together cannot both be crowned. It is released before the remark call.
use std::{sync::Arc, time::Duration};

use serde::Serialize;
use snacks::{
    Badge, DetectedType, Dimensions, GeometryError, LeaderboardEntry, MetricMode, SessionStore,
    SnackObservation, SnackType, Winners, expert_badge, geometry,
};
use thiserror::Error;
use tokio::{sync::Mutex, time::timeout};
use tracing::{error, info, warn};
use vision::{Classifier, RawDimensionEstimate, RemarkRequest, Remarker, VisionError};

use crate::utils::get_image_from_body;

pub const UNRECOGNIZED_SNACK: &str = "Aalae patttikunno? he?";
pub const QUOTA_MESSAGE: &str =
    "Nammade quota theernnu! We've hit our daily analysis limit. Please try again tomorrow.";

#[derive(Error, Debug)]
pub enum Failure {
    #[error("Invalid input provided.")]
    InvalidInput,

    #[error("{0}")]
    Classifier(String),

    #[error("{source}")]
    Geometry {
        snack_type: DetectedType,
        dimensions: Option<Dimensions>,
        source: GeometryError,
    },

    #[error("Could not analyze snack image at this time: {}", QUOTA_MESSAGE)]
    Quota,

    #[error("Could not analyze snack image at this time: {0}")]
    Unknown(String),
}

impl Failure {
    fn upstream(e: &VisionError) -> Self {
        error!("Model call failed: {e}");

        if e.is_quota() {
            Failure::Quota
        } else {
            Failure::Unknown(e.to_string())
        }
    }

    fn timed_out(limit: Duration) -> Self {
        error!("Model call timed out after {limit:?}");

        Failure::Unknown(format!(
            "the model did not answer within {} seconds.",
            limit.as_secs_f64()
        ))
    }
}

#[derive(Debug)]
pub struct Analysis {
    pub snack_type: SnackType,
    pub dimensions: Dimensions,
    pub metric: f64,
    pub remark: Option<String>,
    pub is_new_record: bool,
    pub observation: SnackObservation,
    pub badge: Badge,
    pub winners: Winners,
}

/// Response body for every analysis, successful or not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub snack_type: DetectedType,
    pub dimensions: Option<Dimensions>,
    pub metric: Option<f64>,
    pub mode: MetricMode,
    pub remark: Option<String>,
    pub is_new_record: bool,
    pub new_observation: Option<SnackObservation>,
    pub badge: Option<Badge>,
    pub winners: Winners,
    pub error: Option<String>,
}

impl AnalysisResult {
    fn success(analysis: Analysis, mode: MetricMode) -> Self {
        Self {
            snack_type: analysis.snack_type.into(),
            dimensions: Some(analysis.dimensions),
            metric: Some(analysis.metric),
            mode,
            remark: analysis.remark,
            is_new_record: analysis.is_new_record,
            new_observation: Some(analysis.observation),
            badge: Some(analysis.badge),
            winners: analysis.winners,
            error: None,
        }
    }

    fn failure(failure: Failure, mode: MetricMode, winners: Winners) -> Self {
        let error = Some(failure.to_string());

        let (snack_type, dimensions) = match failure {
            Failure::Geometry {
                snack_type,
                dimensions,
                ..
            } => (snack_type, dimensions),
            _ => (DetectedType::Unknown, None),
        };

        Self {
            snack_type,
            dimensions,
            metric: None,
            mode,
            remark: None,
            is_new_record: false,
            new_observation: None,
            badge: None,
            winners,
            error,
        }
    }
}

/// Manual measurement, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    #[serde(rename = "type")]
    pub snack_type: DetectedType,
    pub dimensions: Option<Dimensions>,
    pub metric: Option<f64>,
    pub mode: MetricMode,
    pub badge: Option<Badge>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSettings {
    pub mode: MetricMode,
    pub timeout: Duration,
    pub expert_threshold: f64,
}

pub struct Analyzer {
    settings: AnalyzerSettings,
    store: Mutex<SessionStore>,
    classifier: Arc<dyn Classifier>,
    remarker: Arc<dyn Remarker>,
}

impl Analyzer {
    pub fn new(
        settings: AnalyzerSettings,
        classifier: Arc<dyn Classifier>,
        remarker: Arc<dyn Remarker>,
    ) -> Self {
        Self {
            store: Mutex::new(SessionStore::new(settings.mode)),
            settings,
            classifier,
            remarker,
        }
    }

    pub fn mode(&self) -> MetricMode {
        self.settings.mode
    }

    pub async fn analyze(&self, body: &[u8]) -> AnalysisResult {
        match self.try_analyze(body).await {
            Ok(analysis) => {
                info!(
                    "Measured {} at {:.2} {}{}",
                    analysis.snack_type,
                    analysis.metric,
                    self.settings.mode.unit(),
                    if analysis.is_new_record { ", new record" } else { "" }
                );

                AnalysisResult::success(analysis, self.settings.mode)
            }
            Err(failure) => {
                warn!("Analysis failed: {failure}");

                AnalysisResult::failure(failure, self.settings.mode, self.winners().await)
            }
        }
    }

    async fn try_analyze(&self, body: &[u8]) -> Result<Analysis, Failure> {
        let mode = self.settings.mode;
        let (request, image) = get_image_from_body(body).map_err(|_| Failure::InvalidInput)?;

        let estimate = match timeout(self.settings.timeout, self.classifier.classify(&image)).await
        {
            Ok(Ok(estimate)) => estimate,
            Ok(Err(e)) => return Err(Failure::upstream(&e)),
            Err(_) => return Err(Failure::timed_out(self.settings.timeout)),
        };

        let (snack_type, dimensions) = classified(&estimate)?;

        let metric = geometry::compute(mode, estimate.snack_type, &dimensions).map_err(|source| {
            Failure::Geometry {
                snack_type: estimate.snack_type,
                dimensions: Some(dimensions),
                source,
            }
        })?;

        let (observation, is_new_record, previous_metric, winners) = {
            let mut store = self.store.lock().await;

            let tracker = store.tracker();
            let previous_metric = tracker.largest_of_type(snack_type).map(|s| s.metric);
            let is_new_record = tracker.is_new_record(snack_type, metric);

            let observation = store.append(snack_type, metric, request.image_data);

            (
                observation,
                is_new_record,
                previous_metric.unwrap_or(0.0),
                store.tracker().all_winners(),
            )
        };

        let remark = self
            .remark(RemarkRequest {
                snack_type,
                new_metric: metric,
                previous_metric,
                mode,
            })
            .await;

        Ok(Analysis {
            snack_type,
            dimensions,
            metric,
            remark,
            is_new_record,
            observation,
            badge: expert_badge(metric, mode, self.settings.expert_threshold),
            winners,
        })
    }

    /// Advisory only. Any failure here is logged and dropped.
    async fn remark(&self, request: RemarkRequest) -> Option<String> {
        match timeout(self.settings.timeout, self.remarker.remark(&request)).await {
            Ok(Ok(comment)) => Some(comment),
            Ok(Err(e)) => {
                warn!("Remark generation failed: {e}");
                None
            }
            Err(_) => {
                warn!("Remark generation timed out");
                None
            }
        }
    }

    pub fn calculate(&self, estimate: &RawDimensionEstimate) -> CalculationResult {
        let mode = self.settings.mode;
        let dimensions = estimate.dimensions().map(geometry::normalize);

        let metric = match &dimensions {
            Some(dimensions) => geometry::compute(mode, estimate.snack_type, dimensions),
            None => Err(GeometryError::UnknownSnack),
        };

        match metric {
            Ok(metric) => CalculationResult {
                snack_type: estimate.snack_type,
                dimensions,
                metric: Some(metric),
                mode,
                badge: Some(expert_badge(metric, mode, self.settings.expert_threshold)),
                error: None,
            },
            Err(e) => CalculationResult {
                snack_type: estimate.snack_type,
                dimensions,
                metric: None,
                mode,
                badge: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub async fn winners(&self) -> Winners {
        self.store.lock().await.tracker().all_winners()
    }

    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.store.lock().await.tracker().top_n(limit)
    }

    pub async fn stored(&self) -> usize {
        self.store.lock().await.len()
    }
}

/// Known snack type plus its normalized dimensions, or the reason the classifier gave up.
fn classified(estimate: &RawDimensionEstimate) -> Result<(SnackType, Dimensions), Failure> {
    if let Some(error) = estimate.error_message() {
        return Err(Failure::Classifier(error.to_string()));
    }

    match (estimate.snack_type.snack_type(), estimate.dimensions()) {
        (Some(snack_type), Some(dimensions)) => Ok((snack_type, geometry::normalize(dimensions))),
        _ => Err(Failure::Classifier(UNRECOGNIZED_SNACK.to_string())),
    }
}
