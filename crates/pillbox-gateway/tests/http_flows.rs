// End-to-end handler flows over an in-memory store and a recording publisher.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pillbox_gateway::app::{build_router, AppState};
use pillbox_relay::{Publisher, Relay, RelayError};
use pillbox_store::PlanStore;

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), RelayError> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

fn app() -> (Router, Arc<RecordingPublisher>) {
    let store = PlanStore::new(rusqlite_memory()).unwrap();
    let publisher = Arc::new(RecordingPublisher::default());
    let relay = Arc::new(Relay::new(
        store.clone(),
        publisher.clone(),
        "pillbox/schedule".to_string(),
    ));
    let state = Arc::new(AppState::new(
        pillbox_core::config::PillboxConfig::default(),
        store,
        relay,
    ));
    (build_router(state), publisher)
}

fn rusqlite_memory() -> rusqlite::Connection {
    rusqlite::Connection::open_in_memory().unwrap()
}

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn create_then_display() {
    let (app, publisher) = app();

    let response = app
        .clone()
        .oneshot(form_post("/createUser", "name=Alice&Monday_morning_red=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, users) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["name"], "Alice");

    let (status, body) = get_json(&app, "/displayUser/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["plan"]["Monday"]["Morning"]["red"], 2);

    // All other 195 cells default to zero.
    let mut zeros = 0;
    for (_, times) in body["plan"].as_object().unwrap() {
        for (_, colors) in times.as_object().unwrap() {
            for (_, quantity) in colors.as_object().unwrap() {
                if quantity.as_u64().unwrap() == 0 {
                    zeros += 1;
                }
            }
        }
    }
    assert_eq!(zeros, 195);

    // Exactly one outbound publish carrying the single non-zero dose.
    let published = publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&published[0].1).unwrap();
    assert_eq!(
        payload["schedule"],
        serde_json::json!([
            {"day": "Monday", "time": "morning", "color": "red", "quantity": 2}
        ])
    );
}

#[tokio::test]
async fn display_unknown_user_is_404() {
    let (app, _) = app();
    let (status, body) = get_json(&app, "/displayUser/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn create_without_name_is_400() {
    let (app, publisher) = app();
    let response = app
        .clone()
        .oneshot(form_post("/createUser", "Monday_morning_red=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(publisher.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, _) = app();

    // Deleting an id that never existed still redirects.
    let response = app
        .clone()
        .oneshot(form_post("/deleteUser/99", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    app.clone()
        .oneshot(form_post("/createUser", "name=Alice"))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(form_post("/deleteUser/1", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (status, _) = get_json(&app, "/displayUser/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_with_empty_submission_zeroes_the_schedule() {
    let (app, publisher) = app();

    app.clone()
        .oneshot(form_post("/createUser", "name=Alice&Monday_morning_red=2"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(form_post("/editUser/1", "name=Alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/displayUser/1"
    );

    let (_, body) = get_json(&app, "/displayUser/1").await;
    assert_eq!(body["plan"]["Monday"]["Morning"]["red"], 0);

    // Create published once, edit published once (with an empty dose list).
    let published = publisher.published.lock().unwrap();
    assert_eq!(published.len(), 2);
    let edit_payload: serde_json::Value = serde_json::from_str(&published[1].1).unwrap();
    assert_eq!(edit_payload["schedule"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn edit_can_rename_a_user() {
    let (app, _) = app();

    app.clone()
        .oneshot(form_post("/createUser", "name=Alice"))
        .await
        .unwrap();
    app.clone()
        .oneshot(form_post("/editUser/1", "name=Alicia&Friday_noon_blue=1"))
        .await
        .unwrap();

    let (_, body) = get_json(&app, "/displayUser/1").await;
    assert_eq!(body["user"]["name"], "Alicia");
    // The slot was never inserted at create time, so the edit UPDATE had no
    // row to touch — the grid still reads zero. Matches the create/edit
    // asymmetry the device firmware relies on.
    assert_eq!(body["plan"]["Friday"]["Noon"]["blue"], 0);
}

#[tokio::test]
async fn health_reports_user_count() {
    let (app, _) = app();
    app.clone()
        .oneshot(form_post("/createUser", "name=Alice"))
        .await
        .unwrap();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["users"], 1);
}
