// crates/server/src/routes/games.rs
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use playlog_core::{Cycle, ExternalRating, Game, GameOverview};
use playlog_db::{CycleFilterParams, GameListParams, GamePatch, GameSort, NewGame};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/overview", get(list_overviews))
        .route(
            "/games/{id}",
            get(game_detail).put(update_game).delete(delete_game),
        )
        .route("/games/{id}/ratings", get(list_ratings).put(upsert_rating))
}

#[derive(Debug, Default, Deserialize)]
struct ListGamesQuery {
    q: Option<String>,
    platform: Option<String>,
    sort: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListGamesQuery>,
) -> ApiResult<Json<Vec<Game>>> {
    let params = GameListParams {
        q: query.q,
        platform: query.platform,
        sort: query
            .sort
            .as_deref()
            .map(GameSort::from_param)
            .unwrap_or_default(),
        limit: query.limit.unwrap_or(50).clamp(1, 200),
        offset: query.offset.unwrap_or(0).max(0),
    };
    Ok(Json(state.db.list_games(&params).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameBody {
    title: String,
    platform: Option<String>,
    cover_url: Option<String>,
    external_source: Option<String>,
    external_id: Option<String>,
}

async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateGameBody>,
) -> ApiResult<(StatusCode, Json<Game>)> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    let game = state
        .db
        .create_game(&NewGame {
            title: title.to_string(),
            platform: body.platform,
            cover_url: body.cover_url,
            external_source: body.external_source,
            external_id: body.external_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(game)))
}

async fn list_overviews(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<GameOverview>>> {
    Ok(Json(state.db.list_game_overviews().await?))
}

/// Everything the game screen renders in one response.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    pub game: Game,
    pub overview: Option<GameOverview>,
    pub ratings: Vec<ExternalRating>,
    pub recent_cycles: Vec<Cycle>,
}

async fn game_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<GameDetail>> {
    let recent = CycleFilterParams {
        game_id: Some(id),
        limit: 10,
        ..Default::default()
    };
    // The four reads are independent; fan out and join.
    let (game, overview, ratings, (recent_cycles, _)) = tokio::try_join!(
        state.db.get_game(id),
        state.db.get_game_overview(id),
        state.db.list_ratings_for_game(id),
        state.db.query_cycles_filtered(&recent),
    )?;
    let game = game.ok_or(ApiError::GameNotFound(id))?;
    Ok(Json(GameDetail {
        game,
        overview,
        ratings,
        recent_cycles,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateGameBody {
    title: Option<String>,
    platform: Option<String>,
    cover_url: Option<String>,
    external_source: Option<String>,
    external_id: Option<String>,
}

async fn update_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateGameBody>,
) -> ApiResult<Json<Game>> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("title is required".to_string()));
        }
    }
    let patch = GamePatch {
        title: body.title.map(|t| t.trim().to_string()),
        platform: body.platform,
        cover_url: body.cover_url,
        external_source: body.external_source,
        external_id: body.external_id,
    };
    let game = state
        .db
        .update_game(id, &patch)
        .await?
        .ok_or(ApiError::GameNotFound(id))?;
    Ok(Json(game))
}

async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.db.delete_game(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::GameNotFound(id))
    }
}

async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ExternalRating>>> {
    state
        .db
        .get_game(id)
        .await?
        .ok_or(ApiError::GameNotFound(id))?;
    Ok(Json(state.db.list_ratings_for_game(id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertRatingBody {
    source: String,
    /// Raw score in the source's own scale.
    score: f64,
    scale_max: f64,
    url: Option<String>,
}

async fn upsert_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpsertRatingBody>,
) -> ApiResult<Json<ExternalRating>> {
    let source = body.source.trim();
    if source.is_empty() {
        return Err(ApiError::BadRequest("source is required".to_string()));
    }
    if !body.score.is_finite() {
        return Err(ApiError::BadRequest("score must be finite".to_string()));
    }
    if !body.scale_max.is_finite() || body.scale_max <= 0.0 {
        return Err(ApiError::BadRequest(
            "scaleMax must be a positive number".to_string(),
        ));
    }
    state
        .db
        .get_game(id)
        .await?
        .ok_or(ApiError::GameNotFound(id))?;
    let rating = state
        .db
        .upsert_rating(id, source, body.score, body.scale_max, body.url.as_deref())
        .await?;
    Ok(Json(rating))
}
