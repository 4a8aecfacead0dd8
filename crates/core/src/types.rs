// crates/core/src/types.rs
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A game in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub platform: Option<String>,
    pub cover_url: Option<String>,
    /// Catalog the game was imported from (e.g. "igdb"), if any.
    pub external_source: Option<String>,
    pub external_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A backlog status (Backlog, Jogando, Finalizado, ...).
///
/// Statuses are data, not an enum: the seed rows ship pt-BR labels but the
/// user can rename or reorder them without touching code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub sort_order: i64,
}

/// A playthrough of a game, enriched with its game, status and
/// finished-session aggregates (one row of the `vw_cycles_enriched` view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: i64,
    pub game_id: i64,
    pub game_title: String,
    pub game_platform: Option<String>,
    pub game_cover_url: Option<String>,
    pub status_id: Option<i64>,
    pub status_name: Option<String>,
    pub status_slug: Option<String>,
    pub started_at: i64,
    /// Set when the playthrough is closed. An open cycle accepts new sessions.
    pub ended_at: Option<i64>,
    /// Final verdict on a 0-10 scale, one decimal.
    pub rating_final: Option<f64>,
    pub review: Option<String>,
    /// Finished sessions only; an in-flight session counts nothing yet.
    pub sessions_count: i64,
    pub total_minutes: i64,
    pub avg_session_score: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A single timed sitting inside a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub cycle_id: i64,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    /// How the sitting felt, 0-10, one decimal.
    pub score: Option<f64>,
    pub note: Option<String>,
}

/// A critic/community rating attached to a game, one per (game, source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ExternalRating {
    pub id: i64,
    pub game_id: i64,
    pub source: String,
    /// Raw score in the source's own scale (e.g. 84 on a 0-100 site).
    pub score: f64,
    pub scale_max: f64,
    pub url: Option<String>,
    pub fetched_at: i64,
    /// 0-10 projection of `score`/`scale_max`, computed on load, never
    /// stored. `None` when the stored scale is degenerate.
    pub normalized_score: Option<f64>,
}

/// Per-game rollup across every cycle (one row of `vw_game_overview`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct GameOverview {
    pub game_id: i64,
    pub title: String,
    pub platform: Option<String>,
    pub cover_url: Option<String>,
    pub cycles_count: i64,
    pub open_cycles: i64,
    pub best_rating: Option<f64>,
    pub total_minutes: i64,
    pub sessions_count: i64,
    pub last_activity_at: Option<i64>,
}

/// Dashboard derivation input: one row per cycle with its finished-session
/// aggregates. Absent aggregates mean "no finished sessions yet" and are
/// treated as zero by the derivation, never skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleStatRow {
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub rating_final: Option<f64>,
    pub status_name: Option<String>,
    pub sessions_count_finished: Option<i64>,
    pub total_minutes_finished: Option<i64>,
}
