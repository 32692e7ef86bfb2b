use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{self, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use snacks::{LeaderboardEntry, Winners};

use crate::{
    analysis::{AnalysisResult, CalculationResult},
    error::AppError,
    state::State,
    utils::get_dimensions_from_body,
};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;
pub const MAX_LEADERBOARD_SIZE: usize = 50;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    limit: Option<usize>,
}

pub async fn analyze_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Json<AnalysisResult> {
    Json(state.analyzer.analyze(&body).await)
}

pub async fn calculate_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Bytes,
) -> Result<Json<CalculationResult>, AppError> {
    let estimate = get_dimensions_from_body(&body)?;

    Ok(Json(state.analyzer.calculate(&estimate)))
}

pub async fn winners_handler(extract::State(state): extract::State<Arc<State>>) -> Json<Winners> {
    Json(state.analyzer.winners().await)
}

pub async fn leaderboard_handler(
    extract::State(state): extract::State<Arc<State>>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    Json(state.analyzer.leaderboard(leaderboard_limit(query.limit)).await)
}

/// Requested leaderboard size, defaulting to 5 and capped at 50.
pub fn leaderboard_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .min(MAX_LEADERBOARD_SIZE)
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
