// crates/server/src/routes/ratings.rs
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::delete;
use axum::Router;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ratings/{id}", delete(delete_rating))
}

async fn delete_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.db.delete_rating(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::RatingNotFound(id))
    }
}
