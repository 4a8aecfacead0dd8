// crates/db/src/queries/statuses.rs
// Status lookup. Statuses are seeded data ordered by `sort_order`.

use crate::{Database, DbResult};
use playlog_core::Status;

impl Database {
    /// List all statuses in display order.
    pub async fn list_statuses(&self) -> DbResult<Vec<Status>> {
        let rows: Vec<(i64, String, String, i64)> = sqlx::query_as(
            "SELECT id, name, slug, sort_order FROM statuses ORDER BY sort_order, id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, slug, sort_order)| Status {
                id,
                name,
                slug,
                sort_order,
            })
            .collect())
    }
}
