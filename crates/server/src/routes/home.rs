// crates/server/src/routes/home.rs
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use playlog_db::HomeDashboard;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/home", get(home))
}

#[derive(Debug, Default, Deserialize)]
struct HomeQuery {
    /// Trailing window in days.
    range: Option<i64>,
}

async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> ApiResult<Json<HomeDashboard>> {
    let range_days = query.range.unwrap_or(30).clamp(1, 365);
    let home = state
        .db
        .home_dashboard(range_days, Utc::now().timestamp())
        .await?;
    Ok(Json(home))
}
