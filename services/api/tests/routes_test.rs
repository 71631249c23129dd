//! Drives the API router end to end against the in-memory store.

use api_lib::adapters::MemoryAdapter;
use api_lib::config::Config;
use api_lib::web::{api_router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use quest_tracker_core::domain::ProgressSnapshot;
use quest_tracker_core::ports::ProgressStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<MemoryAdapter>) {
    let config = Config::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("memory config");
    let store = Arc::new(MemoryAdapter::new(ProgressSnapshot::default()));
    let state = Arc::new(AppState::new(store.clone(), Arc::new(config)));
    (api_router(state), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn dashboard_starts_at_level_one() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["level"], 1);
    assert_eq!(body["profile"]["xp"], 0);
    assert_eq!(body["profile"]["weight"], 110.5);
    assert_eq!(body["xp_to_next_level"], 1000);
}

#[tokio::test]
async fn unsaved_day_returns_blank_template() {
    let (app, store) = test_app();
    let (status, body) = send(&app, Method::GET, "/daily?date=2024-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], false);
    assert_eq!(body["record"]["xp"], 0);
    assert_eq!(body["record"]["daily_quests"]["cardio"], false);
    assert!(store.load().await.unwrap().history.is_empty());
}

#[tokio::test]
async fn posting_a_day_saves_and_levels() {
    let (app, store) = test_app();
    for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/daily?date={day}"),
            Some(json!({ "weight": "100.0", "daily_quests": ["cardio", "strength", "stretching", "water"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(body["profile"]["level"], 2);
    assert_eq!(body["profile"]["xp"], 200);
    assert_eq!(body["total_xp"], 1200);

    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot.history.len(), 3);
    // the third day was written before the rollup crossed level 2
    assert_eq!(snapshot.history[2].level, 1);
}

#[tokio::test]
async fn resubmitting_a_day_overwrites_it() {
    let (app, store) = test_app();
    send(
        &app,
        Method::POST,
        "/daily?date=2024-02-10",
        Some(json!({ "weight": "90", "daily_quests": ["cardio", "water"] })),
    )
    .await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/daily?date=2024-02-10",
        Some(json!({ "daily_quests": ["strength"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["xp"], 100);
    assert_eq!(body["record"]["weight"], 90.0);
    assert_eq!(body["profile"]["xp"], 100);

    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot.history.len(), 1);
    assert!(snapshot.history[0].quests.strength);
    assert!(!snapshot.history[0].quests.cardio);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_changes() {
    let (app, store) = test_app();
    let cases = [
        ("/daily?date=2024-13-01", json!({ "daily_quests": ["cardio"] })),
        ("/daily?date=2024-01-01", json!({ "weight": "heavy", "daily_quests": [] })),
        ("/daily?date=2024-01-01", json!({ "daily_quests": ["juggling"] })),
    ];
    for (uri, body) in cases {
        let (status, response) = send(&app, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(response["error"].is_string());
    }
    assert_eq!(store.load().await.unwrap(), ProgressSnapshot::default());
}

#[tokio::test]
async fn weight_update_changes_only_the_profile_weight() {
    let (app, store) = test_app();
    let (status, body) = send(&app, Method::POST, "/weight", Some(json!({ "weight": "104.2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["weight"], 104.2);
    assert_eq!(body["profile"]["level"], 1);
    assert!(store.load().await.unwrap().history.is_empty());

    let (status, _) = send(&app, Method::POST, "/weight", Some(json!({ "weight": "-5" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn charts_filter_by_range() {
    let (app, _) = test_app();
    for day in ["2024-01-31", "2024-02-01", "2024-02-29", "2024-03-01"] {
        send(
            &app,
            Method::POST,
            &format!("/daily?date={day}"),
            Some(json!({ "weight": "80", "daily_quests": ["water"] })),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/charts?start_date=2024-02-01&end_date=2024-02-29",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series"]["dates"], json!(["2024-02-01", "2024-02-29"]));
    assert_eq!(body["series"]["monthly"].as_array().unwrap().len(), 1);
    assert_eq!(body["series"]["monthly"][0]["label"], "2024-02");

    let (_, body) = send(
        &app,
        Method::POST,
        "/charts",
        Some(json!({ "start_date": "2024-03-01" })),
    )
    .await;
    assert_eq!(body["series"]["dates"], json!(["2024-03-01"]));
    assert_eq!(body["end_date"], Value::Null);

    let (status, _) = send(&app, Method::GET, "/charts?start_date=March", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_and_info_are_listed() {
    let (app, _) = test_app();
    send(
        &app,
        Method::POST,
        "/daily?date=2024-05-01",
        Some(json!({ "daily_quests": ["cardio"] })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);
    assert_eq!(body["history"][0]["date"], "2024-05-01");

    let (status, body) = send(&app, Method::GET, "/info", None).await;
    assert_eq!(status, StatusCode::OK);
    let quests: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["quest"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(quests, ["cardio", "strength", "stretching", "water"]);
}
