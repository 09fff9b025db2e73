//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

use versionup_api::routes;
use versionup_api::state::AppState;
use versionup_core::clock::Clock;
use versionup_event_store::pg_event_repository::PgEventRepository;
use versionup_narration::{MessageCatalog, SpeechOutput};
use versionup_test_support::{FixedClock, RecordingSpeech};

/// Long enough that the deferred reset never fires during a test that does
/// not opt into a shorter delay.
pub const NO_RESET: Duration = Duration::from_secs(3600);

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 3, 10, 9, 0, 0).unwrap(),
    ))
}

/// Build the full app router with a real `PgEventRepository` and a
/// deterministic clock. Uses the same route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_reset_delay(pool, NO_RESET).0
}

/// Build the full app router with a custom auto-reset delay, returning the
/// recording speech output for narration assertions.
pub fn build_test_app_with_reset_delay(
    pool: PgPool,
    reset_delay: Duration,
) -> (Router, Arc<RecordingSpeech>) {
    let speech = Arc::new(RecordingSpeech::new());
    let speech_dyn: Arc<dyn SpeechOutput> = speech.clone();
    let app_state = AppState::new(
        fixed_clock(),
        Arc::new(PgEventRepository::new(pool)),
        Arc::new(MessageCatalog::builtin()),
        speech_dyn,
        reset_delay,
    );

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/runs", routes::runs::router())
        .with_state(app_state);

    (router, speech)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
