// crates/server/src/routes/cycles.rs
// Cycle lifecycle routes, including the nested session endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use playlog_core::{Cycle, Session};
use playlog_db::{CycleFilterParams, CyclePatch, CycleSort, FinishCycle, NewCycle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::routes::{resolve_score, ScoreInput};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cycles", get(list_cycles).post(start_cycle))
        .route(
            "/cycles/{id}",
            get(get_cycle).put(update_cycle).delete(delete_cycle),
        )
        .route("/cycles/{id}/finish", post(finish_cycle))
        .route(
            "/cycles/{id}/sessions",
            get(list_sessions).post(start_session),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCyclesQuery {
    game_id: Option<i64>,
    /// Status slug.
    status: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
    open: Option<bool>,
    rated: Option<bool>,
    sort: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// One page of the cycle list plus the unpaginated match count.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct CyclesPage {
    pub cycles: Vec<Cycle>,
    pub total: usize,
}

async fn list_cycles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCyclesQuery>,
) -> ApiResult<Json<CyclesPage>> {
    let params = CycleFilterParams {
        game_id: query.game_id,
        status: query.status,
        year: query.year,
        month: query.month,
        open_only: query.open.unwrap_or(false),
        rated_only: query.rated.unwrap_or(false),
        sort: query
            .sort
            .as_deref()
            .map(CycleSort::from_param)
            .unwrap_or_default(),
        limit: query.limit.unwrap_or(50).clamp(1, 200),
        offset: query.offset.unwrap_or(0).max(0),
    };
    let (cycles, total) = state.db.query_cycles_filtered(&params).await?;
    Ok(Json(CyclesPage { cycles, total }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartCycleBody {
    game_id: i64,
    status_id: Option<i64>,
    started_at: Option<i64>,
}

async fn start_cycle(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StartCycleBody>,
) -> ApiResult<(StatusCode, Json<Cycle>)> {
    state
        .db
        .get_game(body.game_id)
        .await?
        .ok_or(ApiError::GameNotFound(body.game_id))?;
    let cycle = state
        .db
        .start_cycle(&NewCycle {
            game_id: body.game_id,
            status_id: body.status_id,
            started_at: body.started_at.unwrap_or_else(|| Utc::now().timestamp()),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(cycle)))
}

async fn get_cycle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Cycle>> {
    let cycle = state
        .db
        .get_cycle(id)
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;
    Ok(Json(cycle))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCycleBody {
    status_id: Option<i64>,
    rating_final: Option<ScoreInput>,
    review: Option<String>,
    started_at: Option<i64>,
    ended_at: Option<i64>,
}

async fn update_cycle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCycleBody>,
) -> ApiResult<Json<Cycle>> {
    let existing = state
        .db
        .get_cycle(id)
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;

    let started = body.started_at.unwrap_or(existing.started_at);
    if let Some(ended) = body.ended_at.or(existing.ended_at) {
        if ended < started {
            return Err(ApiError::BadRequest(
                "endedAt must be at or after startedAt".to_string(),
            ));
        }
    }

    // An absent rating leaves the column untouched; a blank string clears
    // it (the doubly-optional patch field carries the difference).
    let patch = CyclePatch {
        status_id: body.status_id,
        rating_final: body.rating_final.map(ScoreInput::into_score).transpose()?,
        review: body.review,
        started_at: body.started_at,
        ended_at: body.ended_at,
    };
    let cycle = state
        .db
        .update_cycle(id, &patch)
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;
    Ok(Json(cycle))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinishCycleBody {
    ended_at: Option<i64>,
    rating_final: Option<ScoreInput>,
    review: Option<String>,
    status_id: Option<i64>,
}

/// Close a playthrough. Refused while a session is still running or when
/// the cycle is already finished.
async fn finish_cycle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<FinishCycleBody>,
) -> ApiResult<Json<Cycle>> {
    let cycle = state
        .db
        .get_cycle(id)
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;
    if cycle.ended_at.is_some() {
        return Err(ApiError::Conflict("cycle is already finished".to_string()));
    }
    if state.db.open_session_for_cycle(id).await?.is_some() {
        return Err(ApiError::Conflict(
            "cycle has an open session; stop it first".to_string(),
        ));
    }

    let ended_at = body.ended_at.unwrap_or_else(|| Utc::now().timestamp());
    if ended_at < cycle.started_at {
        return Err(ApiError::BadRequest(
            "endedAt must be at or after startedAt".to_string(),
        ));
    }

    let finished = state
        .db
        .finish_cycle(
            id,
            &FinishCycle {
                ended_at,
                rating_final: resolve_score(body.rating_final)?,
                review: body.review,
                status_id: body.status_id,
            },
        )
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;
    Ok(Json(finished))
}

async fn delete_cycle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.db.delete_cycle(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::CycleNotFound(id))
    }
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Session>>> {
    state
        .db
        .get_cycle(id)
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;
    Ok(Json(state.db.list_sessions_for_cycle(id).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionBody {
    started_at: Option<i64>,
    note: Option<String>,
}

async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<StartSessionBody>,
) -> ApiResult<(StatusCode, Json<Session>)> {
    let cycle = state
        .db
        .get_cycle(id)
        .await?
        .ok_or(ApiError::CycleNotFound(id))?;
    if cycle.ended_at.is_some() {
        return Err(ApiError::Conflict(
            "cycle is already finished".to_string(),
        ));
    }
    if state.db.open_session_for_cycle(id).await?.is_some() {
        return Err(ApiError::Conflict(
            "cycle already has an open session".to_string(),
        ));
    }

    let started_at = body.started_at.unwrap_or_else(|| Utc::now().timestamp());
    // The precondition races with concurrent starts; the partial unique
    // index is the durable guard.
    match state
        .db
        .start_session(id, started_at, body.note.as_deref())
        .await
    {
        Ok(session) => Ok((StatusCode::CREATED, Json(session))),
        Err(e) if e.is_unique_violation() => Err(ApiError::Conflict(
            "cycle already has an open session".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}
