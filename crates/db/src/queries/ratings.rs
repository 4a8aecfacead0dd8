// crates/db/src/queries/ratings.rs
// External ratings: one row per (game, source), upsert on refetch.

use chrono::Utc;
use playlog_core::rating::normalize_external_score;
use playlog_core::ExternalRating;

use super::row_types::RatingRow;
use crate::{Database, DbResult};

const RATING_COLS: &str = "id, game_id, source, score, scale_max, url, fetched_at";

fn with_normalized(row: RatingRow) -> ExternalRating {
    let mut rating = row.0;
    rating.normalized_score = normalize_external_score(rating.score, rating.scale_max);
    rating
}

impl Database {
    /// All external ratings of a game, alphabetical by source. The 0-10
    /// projection is computed on load, never stored.
    pub async fn list_ratings_for_game(&self, game_id: i64) -> DbResult<Vec<ExternalRating>> {
        let rows: Vec<RatingRow> = sqlx::query_as(&format!(
            "SELECT {RATING_COLS} FROM external_ratings WHERE game_id = ?1 \
             ORDER BY source COLLATE NOCASE"
        ))
        .bind(game_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(with_normalized).collect())
    }

    /// Insert or refresh the rating for (game, source). A refetch from the
    /// same source replaces the previous score and bumps `fetched_at`.
    pub async fn upsert_rating(
        &self,
        game_id: i64,
        source: &str,
        score: f64,
        scale_max: f64,
        url: Option<&str>,
    ) -> DbResult<ExternalRating> {
        let fetched_at = Utc::now().timestamp();
        let row: RatingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO external_ratings (game_id, source, score, scale_max, url, fetched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(game_id, source) DO UPDATE SET
                score = excluded.score,
                scale_max = excluded.scale_max,
                url = COALESCE(excluded.url, external_ratings.url),
                fetched_at = excluded.fetched_at
            RETURNING {RATING_COLS}
            "#
        ))
        .bind(game_id)
        .bind(source)
        .bind(score)
        .bind(scale_max)
        .bind(url)
        .bind(fetched_at)
        .fetch_one(self.pool())
        .await?;
        Ok(with_normalized(row))
    }

    /// Delete a rating by id. Returns whether a row was removed.
    pub async fn delete_rating(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM external_ratings WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
