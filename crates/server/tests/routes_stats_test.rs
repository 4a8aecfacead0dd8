//! Route tests for the statistics dashboard and the home payload.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use routes_shared::{at, seed_cycle, seed_game, seed_session, send, test_app};

#[tokio::test]
async fn test_empty_dashboard_shape() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/stats/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["cycles"], 0);
    assert!(body["kpis"]["avgCycleRating"].is_null());
    assert_eq!(body["ratingTrend"].as_array().unwrap().len(), 0);
    assert_eq!(body["ratingTrendSmooth"].as_array().unwrap().len(), 0);
    assert_eq!(body["ratingHistogram"].as_array().unwrap().len(), 11);
    assert!(body["filter"]["year"].is_null());
}

async fn seed_rated_cycle(app: &axum::Router, game_id: i64, started: i64, ended: i64, rating: f64) {
    let cycle_id = seed_cycle(app, game_id, started).await;
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/cycles/{cycle_id}/finish"),
        Some(json!({ "endedAt": ended, "ratingFinal": rating, "statusId": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn test_dashboard_derives_and_smooths() {
    let app = test_app().await;
    let game_id = seed_game(&app, "Hades").await;
    seed_rated_cycle(&app, game_id, at(2024, 1, 5, 20), at(2024, 1, 20, 22), 10.0).await;
    seed_rated_cycle(&app, game_id, at(2024, 1, 20, 20), at(2024, 1, 25, 22), 7.9).await;

    let (status, body) = send(&app, "GET", "/api/stats/dashboard?year=2024&month=1", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["filter"], json!({ "year": 2024, "month": 1 }));
    assert_eq!(body["kpis"]["cycles"], 2);
    assert_eq!(body["kpis"]["ratedCycles"], 2);
    // (10.0 + 7.9) / 2 rounds half-up to 9.0.
    assert_eq!(body["kpis"]["avgCycleRating"], 9.0);

    // Day mode under a pinned year+month.
    let trend = body["ratingTrend"].as_array().unwrap();
    assert_eq!(trend[0]["label"], "05/01");
    assert_eq!(trend[1]["label"], "20/01");

    // Smoothed line trails the raw one, same length.
    let smooth = body["ratingTrendSmooth"].as_array().unwrap();
    assert_eq!(smooth.len(), 2);
    assert_eq!(smooth[0], 10.0);
    assert_eq!(smooth[1], 9.0);

    let histogram = body["ratingHistogram"].as_array().unwrap();
    assert_eq!(histogram[10]["total"], 1);
    assert_eq!(histogram[7]["total"], 1);

    assert_eq!(body["statusBreakdown"][0]["status"], "Finalizado");
}

#[tokio::test]
async fn test_dashboard_status_filter() {
    let app = test_app().await;
    let game_id = seed_game(&app, "Hades").await;
    seed_rated_cycle(&app, game_id, at(2024, 1, 5, 20), at(2024, 1, 20, 22), 8.0).await;
    seed_cycle(&app, game_id, at(2024, 3, 1, 20)).await;

    let (status, body) = send(&app, "GET", "/api/stats/dashboard?status=finalizado", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["cycles"], 1);
    assert_eq!(body["kpis"]["ratedCycles"], 1);
}

#[tokio::test]
async fn test_home_defaults_and_clamps_the_range() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/home", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rangeDays"], 30);
    assert_eq!(body["kpis"]["streakDays"], 0);
    assert!(body["continuePlaying"].as_array().unwrap().is_empty());
    assert!(body["timeline"].as_array().unwrap().is_empty());

    let (_, wide) = send(&app, "GET", "/api/home?range=9999", None).await;
    assert_eq!(wide["rangeDays"], 365);
    let (_, narrow) = send(&app, "GET", "/api/home?range=0", None).await;
    assert_eq!(narrow["rangeDays"], 1);
}

#[tokio::test]
async fn test_home_reflects_recent_play() {
    let app = test_app().await;
    let game_id = seed_game(&app, "Hades").await;
    let now = chrono::Utc::now().timestamp();

    let cycle_id = seed_cycle(&app, game_id, now - 3 * 86_400).await;
    let session_id = seed_session(&app, cycle_id, now - 2 * 86_400).await;
    send(
        &app,
        "POST",
        &format!("/api/sessions/{session_id}/stop"),
        Some(json!({ "endedAt": now - 2 * 86_400 + 3_600 })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/home", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["totalMinutes"], 60);
    assert_eq!(body["kpis"]["sessionsFinished"], 1);
    assert_eq!(body["kpis"]["openCycles"], 1);
    assert_eq!(body["continuePlaying"][0]["gameTitle"], "Hades");
    assert!(!body["timeline"].as_array().unwrap().is_empty());
}
