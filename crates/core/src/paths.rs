// crates/core/src/paths.rs
//! Centralized path functions for everything playlog stores on disk.
//!
//! Single source of truth so no other crate hardcodes `dirs::...` joins.

use std::path::PathBuf;

/// App data root: `~/.local/share/playlog/` (Linux) or the platform
/// equivalent under `dirs::data_dir()`.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("playlog"))
}

/// SQLite database file: `<app_data_dir>/playlog.db`.
pub fn db_path() -> Option<PathBuf> {
    app_data_dir().map(|d| d.join("playlog.db"))
}
