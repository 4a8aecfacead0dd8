// crates/db/src/queries/games.rs
// Game catalog CRUD and the per-game overview reads.

use chrono::Utc;
use playlog_core::{Game, GameOverview};

use super::row_types::{GameRow, OverviewRow};
use crate::{Database, DbResult};

/// Sort order for the game list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameSort {
    /// Most recently updated first.
    #[default]
    Recent,
    Title,
}

impl GameSort {
    /// Parse the API's `sort` query value; unknown values fall back to
    /// `Recent` rather than erroring.
    pub fn from_param(value: &str) -> Self {
        match value {
            "title" => GameSort::Title,
            _ => GameSort::Recent,
        }
    }
}

/// Filters for `list_games`.
#[derive(Debug, Clone)]
pub struct GameListParams {
    /// Substring match on the title.
    pub q: Option<String>,
    /// Exact platform match.
    pub platform: Option<String>,
    pub sort: GameSort,
    pub limit: i64,
    pub offset: i64,
}

impl Default for GameListParams {
    fn default() -> Self {
        Self {
            q: None,
            platform: None,
            sort: GameSort::default(),
            limit: 50,
            offset: 0,
        }
    }
}

/// Fields for a new catalog entry.
#[derive(Debug, Clone, Default)]
pub struct NewGame {
    pub title: String,
    pub platform: Option<String>,
    pub cover_url: Option<String>,
    pub external_source: Option<String>,
    pub external_id: Option<String>,
}

/// Partial update for a game. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GamePatch {
    pub title: Option<String>,
    pub platform: Option<String>,
    pub cover_url: Option<String>,
    pub external_source: Option<String>,
    pub external_id: Option<String>,
}

impl GamePatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.platform.is_none()
            && self.cover_url.is_none()
            && self.external_source.is_none()
            && self.external_id.is_none()
    }
}

impl Database {
    /// List games with optional search/platform filters, sorted and paginated.
    pub async fn list_games(&self, params: &GameListParams) -> DbResult<Vec<Game>> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT id, title, platform, cover_url, external_source, external_id, \
             created_at, updated_at FROM games WHERE 1=1",
        );

        if let Some(q) = &params.q {
            qb.push(" AND title LIKE ");
            qb.push_bind(format!("%{q}%"));
        }
        if let Some(platform) = &params.platform {
            qb.push(" AND platform = ");
            qb.push_bind(platform.as_str());
        }

        match params.sort {
            GameSort::Title => qb.push(" ORDER BY title COLLATE NOCASE, id"),
            GameSort::Recent => qb.push(" ORDER BY updated_at DESC, id DESC"),
        };

        qb.push(" LIMIT ");
        qb.push_bind(params.limit);
        qb.push(" OFFSET ");
        qb.push_bind(params.offset);

        let rows: Vec<GameRow> = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Fetch one game by id.
    pub async fn get_game(&self, id: i64) -> DbResult<Option<Game>> {
        let row: Option<GameRow> = sqlx::query_as(
            "SELECT id, title, platform, cover_url, external_source, external_id, \
             created_at, updated_at FROM games WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Insert a new game and read it back.
    pub async fn create_game(&self, new: &NewGame) -> DbResult<Game> {
        let now = Utc::now().timestamp();
        let row: GameRow = sqlx::query_as(
            r#"
            INSERT INTO games (title, platform, cover_url, external_source, external_id,
                               created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING id, title, platform, cover_url, external_source, external_id,
                      created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.platform)
        .bind(&new.cover_url)
        .bind(&new.external_source)
        .bind(&new.external_id)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(row.0)
    }

    /// Partial update; only provided fields change. Bumps `updated_at` and
    /// returns the fresh row, or `None` when the game does not exist.
    pub async fn update_game(&self, id: i64, patch: &GamePatch) -> DbResult<Option<Game>> {
        if patch.is_empty() {
            return self.get_game(id).await;
        }

        let mut qb = sqlx::QueryBuilder::new("UPDATE games SET updated_at = ");
        qb.push_bind(Utc::now().timestamp());
        if let Some(title) = &patch.title {
            qb.push(", title = ");
            qb.push_bind(title.as_str());
        }
        if let Some(platform) = &patch.platform {
            qb.push(", platform = ");
            qb.push_bind(platform.as_str());
        }
        if let Some(cover_url) = &patch.cover_url {
            qb.push(", cover_url = ");
            qb.push_bind(cover_url.as_str());
        }
        if let Some(source) = &patch.external_source {
            qb.push(", external_source = ");
            qb.push_bind(source.as_str());
        }
        if let Some(external_id) = &patch.external_id {
            qb.push(", external_id = ");
            qb.push_bind(external_id.as_str());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        qb.build().execute(self.pool()).await?;
        self.get_game(id).await
    }

    /// Delete a game (cycles, sessions and ratings cascade).
    ///
    /// Returns whether a row was removed.
    pub async fn delete_game(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-game rollups for the catalog screen, most recently played first.
    pub async fn list_game_overviews(&self) -> DbResult<Vec<GameOverview>> {
        let rows: Vec<OverviewRow> = sqlx::query_as(
            "SELECT * FROM vw_game_overview \
             ORDER BY last_activity_at IS NULL, last_activity_at DESC, game_id",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Rollup for a single game.
    pub async fn get_game_overview(&self, id: i64) -> DbResult<Option<GameOverview>> {
        let row: Option<OverviewRow> =
            sqlx::query_as("SELECT * FROM vw_game_overview WHERE game_id = ?1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(row.map(|r| r.0))
    }
}
