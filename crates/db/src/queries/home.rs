// crates/db/src/queries/home.rs
// The home screen payload: trailing-range KPIs, "continue playing" cards
// and a merged activity timeline. This replaces what used to be a single
// opaque RPC with typed queries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Database, DbResult};

/// Headline numbers for the trailing range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct HomeKpis {
    /// Minutes across finished sessions that ended inside the range.
    pub total_minutes: i64,
    pub sessions_finished: i64,
    pub cycles_started: i64,
    pub cycles_finished: i64,
    /// Open cycles right now, not bounded by the range.
    pub open_cycles: i64,
    /// Consecutive UTC days with at least one finished session, anchored at
    /// today or yesterday.
    pub streak_days: i64,
}

/// One "continue playing" card: an open cycle ranked by recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ContinueCard {
    pub cycle_id: i64,
    pub game_id: i64,
    pub game_title: String,
    pub game_cover_url: Option<String>,
    pub status_name: Option<String>,
    pub total_minutes: i64,
    /// Start of the most recent session, or the cycle start when the cycle
    /// has no sessions yet.
    pub last_played_at: i64,
}

/// One feed entry. `kind` is one of `cycle_started`, `session_finished`,
/// `cycle_finished`; the optional fields are populated per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub kind: String,
    pub at: i64,
    pub cycle_id: i64,
    pub game_title: String,
    /// Session length, `session_finished` only.
    pub minutes: Option<i64>,
    /// Session score, `session_finished` only.
    pub score: Option<f64>,
    /// Final rating, `cycle_finished` only.
    pub rating: Option<f64>,
}

/// Everything the home screen renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct HomeDashboard {
    pub range_days: i64,
    pub kpis: HomeKpis,
    pub continue_playing: Vec<ContinueCard>,
    pub timeline: Vec<TimelineEvent>,
}

/// Count the streak over distinct play days (epoch days, descending).
///
/// A streak is alive while no full day passes without play: it anchors at
/// `today` or, when today has no play yet, at yesterday. Each further
/// consecutive previous day extends it.
fn streak_from_days(days_desc: &[i64], today: i64) -> i64 {
    let mut expected = match days_desc.first() {
        Some(&d) if d == today || d == today - 1 => d,
        _ => return 0,
    };
    let mut streak = 0;
    for &day in days_desc {
        if day == expected {
            streak += 1;
            expected -= 1;
        } else {
            break;
        }
    }
    streak
}

impl Database {
    /// Assemble the home payload. `now` is a parameter so the range cutoff
    /// and the streak anchor are deterministic under test.
    pub async fn home_dashboard(&self, range_days: i64, now: i64) -> DbResult<HomeDashboard> {
        let since = now - range_days * 86_400;

        let (sessions_finished, total_minutes): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM((ended_at - started_at) / 60), 0) \
             FROM sessions WHERE ended_at IS NOT NULL AND ended_at >= ?1",
        )
        .bind(since)
        .fetch_one(self.pool())
        .await?;

        let (cycles_started,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM cycles WHERE started_at >= ?1")
                .bind(since)
                .fetch_one(self.pool())
                .await?;

        let (cycles_finished,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM cycles WHERE ended_at IS NOT NULL AND ended_at >= ?1")
                .bind(since)
                .fetch_one(self.pool())
                .await?;

        let (open_cycles,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM cycles WHERE ended_at IS NULL")
                .fetch_one(self.pool())
                .await?;

        // Distinct UTC play days, newest first. The streak may reach past
        // the range, so this is not bounded by `since`.
        let play_days: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT ended_at / 86400 AS day FROM sessions \
             WHERE ended_at IS NOT NULL ORDER BY day DESC",
        )
        .fetch_all(self.pool())
        .await?;
        let days_desc: Vec<i64> = play_days.into_iter().map(|(d,)| d).collect();
        let streak_days = streak_from_days(&days_desc, now.div_euclid(86_400));

        let continue_playing = self.continue_playing_cards().await?;
        let timeline = self.recent_timeline().await?;

        Ok(HomeDashboard {
            range_days,
            kpis: HomeKpis {
                total_minutes,
                sessions_finished,
                cycles_started,
                cycles_finished,
                open_cycles,
                streak_days,
            },
            continue_playing,
            timeline,
        })
    }

    /// Up to 6 open cycles, most recently played first.
    async fn continue_playing_cards(&self) -> DbResult<Vec<ContinueCard>> {
        type Row = (i64, i64, String, Option<String>, Option<String>, i64, i64);
        let rows: Vec<Row> = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.game_id,
                g.title,
                g.cover_url,
                st.name,
                COALESCE(cs.total_minutes_finished, 0),
                COALESCE((SELECT MAX(s.started_at) FROM sessions s WHERE s.cycle_id = c.id),
                         c.started_at) AS last_played_at
            FROM cycles c
            JOIN games g ON g.id = c.game_id
            LEFT JOIN statuses st ON st.id = c.status_id
            LEFT JOIN vw_cycle_stats cs ON cs.cycle_id = c.id
            WHERE c.ended_at IS NULL
            ORDER BY last_played_at DESC, c.id DESC
            LIMIT 6
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(cycle_id, game_id, game_title, game_cover_url, status_name, total_minutes, last_played_at)| {
                    ContinueCard {
                        cycle_id,
                        game_id,
                        game_title,
                        game_cover_url,
                        status_name,
                        total_minutes,
                        last_played_at,
                    }
                },
            )
            .collect())
    }

    /// The 20 most recent events across cycle starts, finished sessions and
    /// cycle finishes, newest first.
    async fn recent_timeline(&self) -> DbResult<Vec<TimelineEvent>> {
        type Row = (String, i64, i64, String, Option<i64>, Option<f64>, Option<f64>);
        let rows: Vec<Row> = sqlx::query_as(
            r#"
            SELECT 'cycle_started' AS kind, c.started_at AS at, c.id AS cycle_id,
                   g.title AS game_title,
                   NULL AS minutes, NULL AS score, NULL AS rating
            FROM cycles c JOIN games g ON g.id = c.game_id
            UNION ALL
            SELECT 'session_finished', s.ended_at, s.cycle_id, g.title,
                   (s.ended_at - s.started_at) / 60, s.score, NULL
            FROM sessions s
            JOIN cycles c ON c.id = s.cycle_id
            JOIN games g ON g.id = c.game_id
            WHERE s.ended_at IS NOT NULL
            UNION ALL
            SELECT 'cycle_finished', c.ended_at, c.id, g.title,
                   NULL, NULL, c.rating_final
            FROM cycles c JOIN games g ON g.id = c.game_id
            WHERE c.ended_at IS NOT NULL
            ORDER BY at DESC, cycle_id DESC
            LIMIT 20
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(kind, at, cycle_id, game_title, minutes, score, rating)| TimelineEvent {
                kind,
                at,
                cycle_id,
                game_title,
                minutes,
                score,
                rating,
            })
            .collect())
    }
}
