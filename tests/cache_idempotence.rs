//! Cache idempotence across the full translation flow
//!
//! Submitting the same passage twice in one process lifetime must invoke the
//! remote generation call at most once; the second submission returns the
//! identical text from the cache.

mod common;

use axum::{Extension, Json, extract::State};
use common::*;
use palingua::handlers::translate::{self, TranslateRequest};
use palingua::middleware::RequestId;

fn request(passage: &str) -> TranslateRequest {
    serde_json::from_value(serde_json::json!({ "passage": passage }))
        .expect("valid request body")
}

#[tokio::test]
async fn repeat_submission_hits_cache_not_backend() {
    let backend = CountingBackend::new("May all beings be happy.");
    let state = stub_state(backend.clone());

    let Json(first) = translate::handler(
        State(state.clone()),
        Extension(RequestId::new()),
        Json(request("Sabbe satta bhavantu sukhitatta")),
    )
    .await
    .expect("first submission succeeds");

    assert_eq!(first.translation(), "May all beings be happy.");
    assert!(!first.cached());
    assert_eq!(backend.call_count(), 1);

    let Json(second) = translate::handler(
        State(state),
        Extension(RequestId::new()),
        Json(request("Sabbe satta bhavantu sukhitatta")),
    )
    .await
    .expect("second submission succeeds");

    assert_eq!(second.translation(), "May all beings be happy.");
    assert!(second.cached());
    assert_eq!(backend.call_count(), 1, "remote call must not repeat");
}

#[tokio::test]
async fn different_passages_each_invoke_backend() {
    let backend = CountingBackend::new("translation");
    let state = stub_state(backend.clone());

    for passage in ["Sabbe satta", "Sabbe satta "] {
        // Trailing whitespace is a distinct key: exact match, no normalization.
        translate::handler(
            State(state.clone()),
            Extension(RequestId::new()),
            Json(request(passage)),
        )
        .await
        .expect("submission succeeds");
    }

    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn disabled_cache_always_invokes_backend() {
    let backend = CountingBackend::new("translation");
    let mut toml = String::new();
    toml.push_str(
        r#"
[server]
host = "127.0.0.1"
port = 3000

[models]
base_url = "http://localhost:1"
preference = ["fast-model"]

[cache]
enabled = false
"#,
    );
    let config: palingua::config::Config = toml.parse().expect("config validates");
    let state = palingua::handlers::AppState::with_backend(config, test_pool(), backend.clone())
        .expect("state builds");

    for _ in 0..2 {
        let Json(response) = translate::handler(
            State(state.clone()),
            Extension(RequestId::new()),
            Json(request("Sabbe satta")),
        )
        .await
        .expect("submission succeeds");
        assert!(!response.cached());
    }

    assert_eq!(backend.call_count(), 2);
}
