// crates/db/src/queries/sessions.rs
// Session CRUD. The partial unique index on open sessions backs these
// writes; a UNIQUE failure from `start_session` means the cycle already has
// a sitting in progress.

use playlog_core::Session;

use super::row_types::SessionRow;
use crate::{Database, DbResult};

/// Partial update for a session. `None` leaves the column untouched;
/// `score` is doubly optional so `Some(None)` clears a stored score.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub score: Option<Option<f64>>,
    pub note: Option<String>,
}

impl SessionPatch {
    fn is_empty(&self) -> bool {
        self.started_at.is_none()
            && self.ended_at.is_none()
            && self.score.is_none()
            && self.note.is_none()
    }
}

const SESSION_COLS: &str = "id, cycle_id, started_at, ended_at, score, note";

impl Database {
    /// All sessions of a cycle, newest first.
    pub async fn list_sessions_for_cycle(&self, cycle_id: i64) -> DbResult<Vec<Session>> {
        let rows: Vec<SessionRow> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLS} FROM sessions WHERE cycle_id = ?1 \
             ORDER BY started_at DESC, id DESC"
        ))
        .bind(cycle_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Fetch one session by id.
    pub async fn get_session(&self, id: i64) -> DbResult<Option<Session>> {
        let row: Option<SessionRow> =
            sqlx::query_as(&format!("SELECT {SESSION_COLS} FROM sessions WHERE id = ?1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        Ok(row.map(|r| r.0))
    }

    /// The cycle's in-flight session, if any. The open-session index
    /// guarantees at most one.
    pub async fn open_session_for_cycle(&self, cycle_id: i64) -> DbResult<Option<Session>> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLS} FROM sessions WHERE cycle_id = ?1 AND ended_at IS NULL"
        ))
        .bind(cycle_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Start a sitting. Surfaces the UNIQUE violation of the open-session
    /// index when one is already running; callers map that to a conflict.
    pub async fn start_session(
        &self,
        cycle_id: i64,
        started_at: i64,
        note: Option<&str>,
    ) -> DbResult<Session> {
        let row: SessionRow = sqlx::query_as(&format!(
            "INSERT INTO sessions (cycle_id, started_at, note) VALUES (?1, ?2, ?3) \
             RETURNING {SESSION_COLS}"
        ))
        .bind(cycle_id)
        .bind(started_at)
        .bind(note)
        .fetch_one(self.pool())
        .await?;
        Ok(row.0)
    }

    /// Close a sitting with its end time and optional verdict.
    ///
    /// Returns `None` when the session does not exist.
    pub async fn stop_session(
        &self,
        id: i64,
        ended_at: i64,
        score: Option<f64>,
        note: Option<&str>,
    ) -> DbResult<Option<Session>> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "UPDATE sessions SET ended_at = ?2, score = COALESCE(?3, score), \
             note = COALESCE(?4, note) WHERE id = ?1 RETURNING {SESSION_COLS}"
        ))
        .bind(id)
        .bind(ended_at)
        .bind(score)
        .bind(note)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Partial update; only provided fields change.
    pub async fn update_session(&self, id: i64, patch: &SessionPatch) -> DbResult<Option<Session>> {
        if patch.is_empty() {
            return self.get_session(id).await;
        }

        let mut qb = sqlx::QueryBuilder::new("UPDATE sessions SET id = id");
        if let Some(started_at) = patch.started_at {
            qb.push(", started_at = ");
            qb.push_bind(started_at);
        }
        if let Some(ended_at) = patch.ended_at {
            qb.push(", ended_at = ");
            qb.push_bind(ended_at);
        }
        if let Some(score) = patch.score {
            qb.push(", score = ");
            qb.push_bind(score);
        }
        if let Some(note) = &patch.note {
            qb.push(", note = ");
            qb.push_bind(note.as_str());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        qb.build().execute(self.pool()).await?;
        self.get_session(id).await
    }

    /// Delete a session. Returns whether a row was removed.
    pub async fn delete_session(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
