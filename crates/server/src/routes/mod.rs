// crates/server/src/routes/mod.rs
pub mod cycles;
pub mod games;
pub mod health;
pub mod home;
pub mod ratings;
pub mod sessions;
pub mod stats;
pub mod statuses;

use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::AppState;

/// All API routes, mounted under `/api` by `create_app`.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(statuses::router())
        .merge(games::router())
        .merge(ratings::router())
        .merge(cycles::router())
        .merge(sessions::router())
        .merge(stats::router())
        .merge(home::router())
}

/// A 0-10 score as clients send it: a JSON number, or a string that may use
/// a comma decimal separator ("8,5"). Blank strings mean "no score".
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(untagged)]
pub enum ScoreInput {
    Number(f64),
    Text(String),
}

impl ScoreInput {
    /// Resolve to the stored form: clamped to [0, 10], one decimal.
    pub fn into_score(self) -> Result<Option<f64>, ApiError> {
        match self {
            ScoreInput::Number(value) => playlog_core::rating::clamp_score(value)
                .map(Some)
                .ok_or_else(|| ApiError::BadRequest("score must be numeric".to_string())),
            ScoreInput::Text(text) => {
                if text.trim().is_empty() {
                    return Ok(None);
                }
                playlog_core::rating::parse_score_input(&text)
                    .map(Some)
                    .ok_or_else(|| ApiError::BadRequest("score must be numeric".to_string()))
            }
        }
    }
}

/// Absent fields stay absent; present fields must resolve.
pub fn resolve_score(input: Option<ScoreInput>) -> Result<Option<f64>, ApiError> {
    match input {
        Some(input) => input.into_score(),
        None => Ok(None),
    }
}
