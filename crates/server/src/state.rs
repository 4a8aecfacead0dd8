// crates/server/src/state.rs
use playlog_db::Database;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to all route handlers.
pub struct AppState {
    /// Server start time, for uptime reporting.
    pub start_time: Instant,
    /// SQLite-backed store for the backlog.
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
        })
    }

    /// Seconds since the server started.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
