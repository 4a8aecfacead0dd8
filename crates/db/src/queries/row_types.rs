// crates/db/src/queries/row_types.rs
// Manual FromRow impls mapping view/table rows onto the core domain types.
// playlog-core stays free of sqlx, so the column mapping lives here.

use playlog_core::{Cycle, CycleStatRow, ExternalRating, Game, GameOverview, Session};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// One row of `vw_cycles_enriched`.
///
/// The aggregate columns come through the LEFT JOIN on `vw_cycle_stats`; a
/// cycle with no finished sessions yields 0/0/NULL, never a missing row.
pub(crate) struct CycleRow(pub Cycle);

impl<'r> sqlx::FromRow<'r, SqliteRow> for CycleRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Cycle {
            id: row.try_get("id")?,
            game_id: row.try_get("game_id")?,
            game_title: row.try_get("game_title")?,
            game_platform: row.try_get("game_platform")?,
            game_cover_url: row.try_get("game_cover_url")?,
            status_id: row.try_get("status_id")?,
            status_name: row.try_get("status_name")?,
            status_slug: row.try_get("status_slug")?,
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
            rating_final: row.try_get("rating_final")?,
            review: row.try_get("review")?,
            sessions_count: row
                .try_get::<Option<i64>, _>("sessions_count_finished")?
                .unwrap_or(0),
            total_minutes: row
                .try_get::<Option<i64>, _>("total_minutes_finished")?
                .unwrap_or(0),
            avg_session_score: row.try_get("avg_session_score")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

/// One row of `vw_game_overview`.
pub(crate) struct OverviewRow(pub GameOverview);

impl<'r> sqlx::FromRow<'r, SqliteRow> for OverviewRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(GameOverview {
            game_id: row.try_get("game_id")?,
            title: row.try_get("title")?,
            platform: row.try_get("platform")?,
            cover_url: row.try_get("cover_url")?,
            cycles_count: row.try_get("cycles_count")?,
            open_cycles: row.try_get("open_cycles")?,
            best_rating: row.try_get("best_rating")?,
            total_minutes: row.try_get("total_minutes")?,
            sessions_count: row.try_get("sessions_count")?,
            last_activity_at: row.try_get("last_activity_at")?,
        }))
    }
}

pub(crate) struct GameRow(pub Game);

impl<'r> sqlx::FromRow<'r, SqliteRow> for GameRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Game {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            platform: row.try_get("platform")?,
            cover_url: row.try_get("cover_url")?,
            external_source: row.try_get("external_source")?,
            external_id: row.try_get("external_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

pub(crate) struct SessionRow(pub Session);

impl<'r> sqlx::FromRow<'r, SqliteRow> for SessionRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Session {
            id: row.try_get("id")?,
            cycle_id: row.try_get("cycle_id")?,
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
            score: row.try_get("score")?,
            note: row.try_get("note")?,
        }))
    }
}

/// One `external_ratings` row. `normalized_score` is computed by the caller
/// (it depends on core's normalization, not on a stored column).
pub(crate) struct RatingRow(pub ExternalRating);

impl<'r> sqlx::FromRow<'r, SqliteRow> for RatingRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(ExternalRating {
            id: row.try_get("id")?,
            game_id: row.try_get("game_id")?,
            source: row.try_get("source")?,
            score: row.try_get("score")?,
            scale_max: row.try_get("scale_max")?,
            url: row.try_get("url")?,
            fetched_at: row.try_get("fetched_at")?,
            normalized_score: None,
        }))
    }
}

/// Derivation input row, projected out of `vw_cycles_enriched`.
pub(crate) struct StatRow(pub CycleStatRow);

impl<'r> sqlx::FromRow<'r, SqliteRow> for StatRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(CycleStatRow {
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
            rating_final: row.try_get("rating_final")?,
            status_name: row.try_get("status_name")?,
            sessions_count_finished: row.try_get("sessions_count_finished")?,
            total_minutes_finished: row.try_get("total_minutes_finished")?,
        }))
    }
}
