// crates/server/src/routes/sessions.rs
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};
use chrono::Utc;
use playlog_core::Session;
use playlog_db::SessionPatch;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::routes::{resolve_score, ScoreInput};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions/{id}/stop", post(stop_session))
        .route("/sessions/{id}", put(update_session).delete(delete_session))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopSessionBody {
    ended_at: Option<i64>,
    score: Option<ScoreInput>,
    note: Option<String>,
}

async fn stop_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<StopSessionBody>,
) -> ApiResult<Json<Session>> {
    let session = state
        .db
        .get_session(id)
        .await?
        .ok_or(ApiError::SessionNotFound(id))?;
    if session.ended_at.is_some() {
        return Err(ApiError::Conflict(
            "session is already stopped".to_string(),
        ));
    }

    let ended_at = body.ended_at.unwrap_or_else(|| Utc::now().timestamp());
    if ended_at < session.started_at {
        return Err(ApiError::BadRequest(
            "endedAt must be at or after startedAt".to_string(),
        ));
    }

    let score = resolve_score(body.score)?;
    let stopped = state
        .db
        .stop_session(id, ended_at, score, body.note.as_deref())
        .await?
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(stopped))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSessionBody {
    started_at: Option<i64>,
    ended_at: Option<i64>,
    score: Option<ScoreInput>,
    note: Option<String>,
}

async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSessionBody>,
) -> ApiResult<Json<Session>> {
    let existing = state
        .db
        .get_session(id)
        .await?
        .ok_or(ApiError::SessionNotFound(id))?;

    let started = body.started_at.unwrap_or(existing.started_at);
    if let Some(ended) = body.ended_at.or(existing.ended_at) {
        if ended < started {
            return Err(ApiError::BadRequest(
                "endedAt must be at or after startedAt".to_string(),
            ));
        }
    }

    // An absent score leaves the column untouched; a blank string clears
    // it (the doubly-optional patch field carries the difference).
    let patch = SessionPatch {
        started_at: body.started_at,
        ended_at: body.ended_at,
        score: body.score.map(ScoreInput::into_score).transpose()?,
        note: body.note,
    };
    let session = state
        .db
        .update_session(id, &patch)
        .await?
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(session))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.db.delete_session(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}
