//! Shared seed helpers for the Database integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use playlog_core::{Cycle, Game, Session};
use playlog_db::{Database, NewCycle, NewGame};

/// Epoch seconds for a UTC calendar moment.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> i64 {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
        .timestamp()
}

pub async fn seed_game(db: &Database, title: &str) -> Game {
    db.create_game(&NewGame {
        title: title.to_string(),
        ..Default::default()
    })
    .await
    .unwrap()
}

pub async fn seed_game_on(db: &Database, title: &str, platform: &str) -> Game {
    db.create_game(&NewGame {
        title: title.to_string(),
        platform: Some(platform.to_string()),
        ..Default::default()
    })
    .await
    .unwrap()
}

pub async fn seed_cycle(db: &Database, game_id: i64, started_at: i64) -> Cycle {
    db.start_cycle(&NewCycle {
        game_id,
        status_id: None,
        started_at,
    })
    .await
    .unwrap()
}

pub async fn seed_cycle_with_status(
    db: &Database,
    game_id: i64,
    started_at: i64,
    status_id: i64,
) -> Cycle {
    db.start_cycle(&NewCycle {
        game_id,
        status_id: Some(status_id),
        started_at,
    })
    .await
    .unwrap()
}

/// Start and immediately stop a session, returning the finished row.
pub async fn seed_finished_session(
    db: &Database,
    cycle_id: i64,
    started_at: i64,
    ended_at: i64,
    score: Option<f64>,
) -> Session {
    let session = db.start_session(cycle_id, started_at, None).await.unwrap();
    db.stop_session(session.id, ended_at, score, None)
        .await
        .unwrap()
        .expect("session exists")
}
