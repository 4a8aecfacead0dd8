//! Integration tests for the home dashboard payload.

use playlog_db::{Database, FinishCycle};

mod queries_shared;
use queries_shared::{at, seed_cycle, seed_finished_session, seed_game};

/// Fixed "now": 2024-06-10 12:00 UTC.
fn now() -> i64 {
    at(2024, 6, 10, 12)
}

#[tokio::test]
async fn test_empty_database_home() {
    let db = Database::new_in_memory().await.unwrap();
    let home = db.home_dashboard(30, now()).await.unwrap();

    assert_eq!(home.range_days, 30);
    assert_eq!(home.kpis.total_minutes, 0);
    assert_eq!(home.kpis.sessions_finished, 0);
    assert_eq!(home.kpis.open_cycles, 0);
    assert_eq!(home.kpis.streak_days, 0);
    assert!(home.continue_playing.is_empty());
    assert!(home.timeline.is_empty());
}

#[tokio::test]
async fn test_kpis_respect_the_trailing_range() {
    let db = Database::new_in_memory().await.unwrap();
    let game = seed_game(&db, "Hades").await;

    // Inside the 30-day window: one open cycle with a 60-minute session.
    let recent = seed_cycle(&db, game.id, at(2024, 6, 1, 20)).await;
    seed_finished_session(&db, recent.id, at(2024, 6, 9, 20), at(2024, 6, 9, 21), None).await;

    // Far outside the window: started, played and finished in January.
    let old = seed_cycle(&db, game.id, at(2024, 1, 1, 20)).await;
    seed_finished_session(&db, old.id, at(2024, 1, 2, 20), at(2024, 1, 2, 22), None).await;
    db.finish_cycle(
        old.id,
        &FinishCycle {
            ended_at: at(2024, 1, 10, 22),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let home = db.home_dashboard(30, now()).await.unwrap();
    assert_eq!(home.kpis.total_minutes, 60, "January's 120min are outside");
    assert_eq!(home.kpis.sessions_finished, 1);
    assert_eq!(home.kpis.cycles_started, 1);
    assert_eq!(home.kpis.cycles_finished, 0);
    assert_eq!(home.kpis.open_cycles, 1, "open count ignores the range");
}

#[tokio::test]
async fn test_streak_counts_consecutive_play_days() {
    let db = Database::new_in_memory().await.unwrap();
    let game = seed_game(&db, "Hades").await;
    let cycle = seed_cycle(&db, game.id, at(2024, 6, 1, 20)).await;

    // Played on the 8th, 9th and 10th; the 5th is disconnected.
    for day in [8, 9, 10] {
        seed_finished_session(&db, cycle.id, at(2024, 6, day, 8), at(2024, 6, day, 9), None).await;
    }
    seed_finished_session(&db, cycle.id, at(2024, 6, 5, 8), at(2024, 6, 5, 9), None).await;

    let home = db.home_dashboard(30, now()).await.unwrap();
    assert_eq!(home.kpis.streak_days, 3);

    // One day later with no play the streak is still alive; two days later
    // it is gone.
    let tomorrow = db.home_dashboard(30, now() + 86_400).await.unwrap();
    assert_eq!(tomorrow.kpis.streak_days, 3);
    let later = db.home_dashboard(30, now() + 2 * 86_400).await.unwrap();
    assert_eq!(later.kpis.streak_days, 0);
}

#[tokio::test]
async fn test_continue_playing_ranked_by_recency() {
    let db = Database::new_in_memory().await.unwrap();
    let hades = seed_game(&db, "Hades").await;
    let celeste = seed_game(&db, "Celeste").await;

    // Celeste's cycle started earlier but was played more recently.
    let hades_cycle = seed_cycle(&db, hades.id, at(2024, 6, 1, 20)).await;
    let celeste_cycle = seed_cycle(&db, celeste.id, at(2024, 5, 1, 20)).await;
    seed_finished_session(&db, celeste_cycle.id, at(2024, 6, 9, 20), at(2024, 6, 9, 21), None)
        .await;

    // A finished cycle never shows up.
    let done = seed_cycle(&db, hades.id, at(2024, 6, 5, 20)).await;
    db.finish_cycle(
        done.id,
        &FinishCycle {
            ended_at: at(2024, 6, 6, 20),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let home = db.home_dashboard(30, now()).await.unwrap();
    assert_eq!(home.continue_playing.len(), 2);
    assert_eq!(home.continue_playing[0].game_title, "Celeste");
    assert_eq!(home.continue_playing[0].total_minutes, 60);
    assert_eq!(home.continue_playing[0].last_played_at, at(2024, 6, 9, 20));
    assert_eq!(home.continue_playing[1].cycle_id, hades_cycle.id);
    assert_eq!(
        home.continue_playing[1].last_played_at,
        at(2024, 6, 1, 20),
        "falls back to the cycle start"
    );
}

#[tokio::test]
async fn test_timeline_merges_event_kinds_newest_first() {
    let db = Database::new_in_memory().await.unwrap();
    let game = seed_game(&db, "Hades").await;

    let cycle = seed_cycle(&db, game.id, at(2024, 6, 1, 20)).await;
    seed_finished_session(
        &db,
        cycle.id,
        at(2024, 6, 2, 20),
        at(2024, 6, 2, 20) + 75 * 60,
        Some(8.5),
    )
    .await;
    db.finish_cycle(
        cycle.id,
        &FinishCycle {
            ended_at: at(2024, 6, 3, 22),
            rating_final: Some(9.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let home = db.home_dashboard(30, now()).await.unwrap();
    let kinds: Vec<&str> = home.timeline.iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, vec!["cycle_finished", "session_finished", "cycle_started"]);

    let finished = &home.timeline[0];
    assert_eq!(finished.rating, Some(9.0));
    assert_eq!(finished.game_title, "Hades");

    let session = &home.timeline[1];
    assert_eq!(session.minutes, Some(75));
    assert_eq!(session.score, Some(8.5));
    assert_eq!(session.rating, None);
}

#[tokio::test]
async fn test_timeline_caps_at_twenty_events() {
    let db = Database::new_in_memory().await.unwrap();
    let game = seed_game(&db, "Hades").await;

    // 12 cycles, each with one finished session: 24 events total.
    for day in 1..=12 {
        let cycle = seed_cycle(&db, game.id, at(2024, 5, day, 10)).await;
        seed_finished_session(&db, cycle.id, at(2024, 5, day, 20), at(2024, 5, day, 21), None)
            .await;
    }

    let home = db.home_dashboard(60, now()).await.unwrap();
    assert_eq!(home.timeline.len(), 20);
    assert!(home.timeline.windows(2).all(|w| w[0].at >= w[1].at));
}
