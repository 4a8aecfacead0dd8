// crates/server/src/routes/statuses.rs
use axum::{extract::State, routing::get, Json, Router};
use playlog_core::Status;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/statuses", get(list_statuses))
}

/// Backlog statuses in their configured order.
async fn list_statuses(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Status>>> {
    Ok(Json(state.db.list_statuses().await?))
}
