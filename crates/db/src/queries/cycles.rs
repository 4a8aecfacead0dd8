// crates/db/src/queries/cycles.rs
// Cycle lifecycle and the filtered list over `vw_cycles_enriched`.

use chrono::{TimeZone, Utc};
use playlog_core::Cycle;

use super::row_types::CycleRow;
use crate::{Database, DbResult};

/// Sort order for the cycle list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleSort {
    /// Most recently started first.
    #[default]
    Recent,
    Oldest,
    /// Highest final rating first (unrated last).
    Rating,
    /// Most played first.
    Minutes,
}

impl CycleSort {
    /// Parse the API's `sort` query value; unknown values fall back to
    /// `Recent`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "oldest" => CycleSort::Oldest,
            "rating" => CycleSort::Rating,
            "minutes" => CycleSort::Minutes,
            _ => CycleSort::Recent,
        }
    }
}

/// Filters for `query_cycles_filtered`.
#[derive(Debug, Clone)]
pub struct CycleFilterParams {
    pub game_id: Option<i64>,
    /// Status slug (e.g. "jogando").
    pub status: Option<String>,
    /// Restrict `started_at` to a calendar year (UTC).
    pub year: Option<i32>,
    /// 1-12; only effective together with `year`.
    pub month: Option<u32>,
    /// Only cycles without an `ended_at`.
    pub open_only: bool,
    /// Only cycles carrying a final rating.
    pub rated_only: bool,
    pub sort: CycleSort,
    pub limit: i64,
    pub offset: i64,
}

impl Default for CycleFilterParams {
    fn default() -> Self {
        Self {
            game_id: None,
            status: None,
            year: None,
            month: None,
            open_only: false,
            rated_only: false,
            sort: CycleSort::default(),
            limit: 50,
            offset: 0,
        }
    }
}

/// Fields for starting a new playthrough.
#[derive(Debug, Clone)]
pub struct NewCycle {
    pub game_id: i64,
    pub status_id: Option<i64>,
    pub started_at: i64,
}

/// Partial update for a cycle. `None` leaves the column untouched;
/// `rating_final` is doubly optional so `Some(None)` clears a stored
/// rating.
#[derive(Debug, Clone, Default)]
pub struct CyclePatch {
    pub status_id: Option<i64>,
    pub rating_final: Option<Option<f64>>,
    pub review: Option<String>,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
}

impl CyclePatch {
    fn is_empty(&self) -> bool {
        self.status_id.is_none()
            && self.rating_final.is_none()
            && self.review.is_none()
            && self.started_at.is_none()
            && self.ended_at.is_none()
    }
}

/// Fields for closing a playthrough.
#[derive(Debug, Clone, Default)]
pub struct FinishCycle {
    pub ended_at: i64,
    pub rating_final: Option<f64>,
    pub review: Option<String>,
    pub status_id: Option<i64>,
}

/// UTC epoch-second bounds `[start, end)` of a calendar year.
pub fn year_bounds(year: i32) -> (i64, i64) {
    (utc_midnight(year, 1), utc_midnight(year + 1, 1))
}

/// UTC epoch-second bounds `[start, end)` of a calendar month (1-12).
/// Out-of-range months are clamped into 1-12.
pub fn month_bounds(year: i32, month: u32) -> (i64, i64) {
    let month = month.clamp(1, 12);
    let start = utc_midnight(year, month);
    let end = if month == 12 {
        utc_midnight(year + 1, 1)
    } else {
        utc_midnight(year, month + 1)
    };
    (start, end)
}

fn utc_midnight(year: i32, month: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

const ENRICHED_COLS: &str = "id, game_id, game_title, game_platform, game_cover_url, \
     status_id, status_name, status_slug, started_at, ended_at, rating_final, review, \
     sessions_count_finished, total_minutes_finished, avg_session_score, \
     created_at, updated_at";

impl Database {
    /// Filtered, sorted and paginated cycle list plus the total match count.
    pub async fn query_cycles_filtered(
        &self,
        params: &CycleFilterParams,
    ) -> DbResult<(Vec<Cycle>, usize)> {
        // Called twice so COUNT and SELECT stay in lockstep.
        fn append_filters<'args>(
            qb: &mut sqlx::QueryBuilder<'args, sqlx::Sqlite>,
            params: &'args CycleFilterParams,
        ) {
            qb.push(" WHERE 1=1");

            if let Some(game_id) = params.game_id {
                qb.push(" AND game_id = ");
                qb.push_bind(game_id);
            }
            if let Some(status) = &params.status {
                qb.push(" AND status_slug = ");
                qb.push_bind(status.as_str());
            }
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
            if params.open_only {
                qb.push(" AND ended_at IS NULL");
            }
            if params.rated_only {
                qb.push(" AND rating_final IS NOT NULL");
            }
        }

        let mut count_qb = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM vw_cycles_enriched");
        append_filters(&mut count_qb, params);
        let total: (i64,) = count_qb.build_query_as().fetch_one(self.pool()).await?;

        let mut data_qb = sqlx::QueryBuilder::new(format!(
            "SELECT {ENRICHED_COLS} FROM vw_cycles_enriched"
        ));
        append_filters(&mut data_qb, params);

        // started_at DESC tiebreak keeps pagination deterministic.
        match params.sort {
            CycleSort::Recent => data_qb.push(" ORDER BY started_at DESC, id DESC"),
            CycleSort::Oldest => data_qb.push(" ORDER BY started_at ASC, id ASC"),
            CycleSort::Rating => {
                data_qb.push(" ORDER BY rating_final IS NULL, rating_final DESC, started_at DESC")
            }
            CycleSort::Minutes => {
                data_qb.push(" ORDER BY total_minutes_finished DESC, started_at DESC")
            }
        };

        data_qb.push(" LIMIT ");
        data_qb.push_bind(params.limit);
        data_qb.push(" OFFSET ");
        data_qb.push_bind(params.offset);

        let rows: Vec<CycleRow> = data_qb.build_query_as().fetch_all(self.pool()).await?;
        Ok((rows.into_iter().map(|r| r.0).collect(), total.0 as usize))
    }

    /// Fetch one enriched cycle by id.
    pub async fn get_cycle(&self, id: i64) -> DbResult<Option<Cycle>> {
        let row: Option<CycleRow> = sqlx::query_as(&format!(
            "SELECT {ENRICHED_COLS} FROM vw_cycles_enriched WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Insert a new cycle and read back the enriched row.
    pub async fn start_cycle(&self, new: &NewCycle) -> DbResult<Cycle> {
        let now = Utc::now().timestamp();
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO cycles (game_id, status_id, started_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id
            "#,
        )
        .bind(new.game_id)
        .bind(new.status_id)
        .bind(new.started_at)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        let cycle = self.get_cycle(id).await?;
        cycle.ok_or(crate::DbError::Sqlx(sqlx::Error::RowNotFound))
    }

    /// Partial update; only provided fields change. Bumps `updated_at` and
    /// returns the fresh enriched row, or `None` when the cycle is missing.
    pub async fn update_cycle(&self, id: i64, patch: &CyclePatch) -> DbResult<Option<Cycle>> {
        if patch.is_empty() {
            return self.get_cycle(id).await;
        }

        let mut qb = sqlx::QueryBuilder::new("UPDATE cycles SET updated_at = ");
        qb.push_bind(Utc::now().timestamp());
        if let Some(status_id) = patch.status_id {
            qb.push(", status_id = ");
            qb.push_bind(status_id);
        }
        if let Some(rating) = patch.rating_final {
            qb.push(", rating_final = ");
            qb.push_bind(rating);
        }
        if let Some(review) = &patch.review {
            qb.push(", review = ");
            qb.push_bind(review.as_str());
        }
        if let Some(started_at) = patch.started_at {
            qb.push(", started_at = ");
            qb.push_bind(started_at);
        }
        if let Some(ended_at) = patch.ended_at {
            qb.push(", ended_at = ");
            qb.push_bind(ended_at);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        qb.build().execute(self.pool()).await?;
        self.get_cycle(id).await
    }

    /// Close a playthrough: set `ended_at` plus optional verdict fields.
    ///
    /// The open-session precondition lives in the service layer; this method
    /// only writes.
    pub async fn finish_cycle(&self, id: i64, finish: &FinishCycle) -> DbResult<Option<Cycle>> {
        let result = sqlx::query(
            r#"
            UPDATE cycles SET
                ended_at = ?2,
                rating_final = COALESCE(?3, rating_final),
                review = COALESCE(?4, review),
                status_id = COALESCE(?5, status_id),
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(finish.ended_at)
        .bind(finish.rating_final)
        .bind(&finish.review)
        .bind(finish.status_id)
        .bind(Utc::now().timestamp())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_cycle(id).await
    }

    /// Delete a cycle (its sessions cascade). Returns whether a row was
    /// removed.
    pub async fn delete_cycle(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cycles WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
