// crates/db/src/queries/stats.rs
// Fetch of the dashboard derivation input: one flat row per cycle.

use super::cycles::{month_bounds, year_bounds};
use super::row_types::StatRow;
use crate::{Database, DbResult};
use playlog_core::CycleStatRow;

/// Optional pre-filters for `cycle_stat_rows`. Mirrors the dashboard's
/// filter bar: a year, a year+month, and/or a status slug.
#[derive(Debug, Clone, Default)]
pub struct StatRowParams {
    pub year: Option<i32>,
    /// 1-12; only effective together with `year`.
    pub month: Option<u32>,
    /// Status slug.
    pub status: Option<String>,
}

impl Database {
    /// All cycles matching the filter, projected down to what
    /// `derive_dashboard` consumes, oldest first.
    pub async fn cycle_stat_rows(&self, params: &StatRowParams) -> DbResult<Vec<CycleStatRow>> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT started_at, ended_at, rating_final, status_name, \
             sessions_count_finished, total_minutes_finished \
             FROM vw_cycles_enriched WHERE 1=1",
        );

        if let Some(year) = params.year {
            let (start, end) = match params.month {
                Some(month) => month_bounds(year, month),
                None => year_bounds(year),
            };
            qb.push(" AND started_at >= ");
            qb.push_bind(start);
            qb.push(" AND started_at < ");
            qb.push_bind(end);
        }
        if let Some(status) = &params.status {
            qb.push(" AND status_slug = ");
            qb.push_bind(status.as_str());
        }
        qb.push(" ORDER BY started_at ASC, id ASC");

        let rows: Vec<StatRow> = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
