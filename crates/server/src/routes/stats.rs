// crates/server/src/routes/stats.rs
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use playlog_core::{
    derive_dashboard, moving_average, DashboardFilter, DashboardKpis, HistogramBucket,
    StatusSlice, TrendPoint,
};
use playlog_db::StatRowParams;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats/dashboard", get(dashboard))
}

#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    year: Option<i32>,
    /// 1-12.
    month: Option<u32>,
    /// Status slug.
    status: Option<String>,
}

/// Everything the statistics screen renders, plus a smoothed trend line.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct StatsDashboardResponse {
    pub filter: DashboardFilter,
    pub kpis: DashboardKpis,
    pub rating_trend: Vec<TrendPoint>,
    /// 3-point trailing moving average over the trend values.
    pub rating_trend_smooth: Vec<f64>,
    pub status_breakdown: Vec<StatusSlice>,
    pub rating_histogram: Vec<HistogramBucket>,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<StatsDashboardResponse>> {
    let rows = state
        .db
        .cycle_stat_rows(&StatRowParams {
            year: query.year,
            month: query.month,
            status: query.status,
        })
        .await?;
    let filter = DashboardFilter {
        year: query.year,
        month: query.month,
    };
    let data = derive_dashboard(&rows, &filter);

    let trend_values: Vec<f64> = data.rating_trend.iter().map(|p| p.value).collect();
    let rating_trend_smooth = moving_average(&trend_values, 3);

    Ok(Json(StatsDashboardResponse {
        filter,
        kpis: data.kpis,
        rating_trend: data.rating_trend,
        rating_trend_smooth,
        status_breakdown: data.status_breakdown,
        rating_histogram: data.rating_histogram,
    }))
}
