//! Shared helpers for integration tests

#![allow(dead_code)]

use palingua::config::Config;
use palingua::error::AppResult;
use palingua::generation::GenerationBackend;
use palingua::handlers::AppState;
use palingua::resolver::{Credential, ResolvedModel};
use async_trait::async_trait;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a validated config pointed at `base_url`
pub fn test_config(base_url: &str, retry_on_unavailable: bool) -> Config {
    let toml = format!(
        r#"
[server]
host = "127.0.0.1"
port = 3000
request_timeout_seconds = 5

[credentials]
env = ["PALINGUA_TEST_KEY"]
strategy = "first"

[models]
base_url = "{base_url}"
preference = ["fast-model", "pro-model"]
retry_on_unavailable = {retry_on_unavailable}

[prompt]
template = "You are a Pali scholar. Translate: {{passage}}"
"#
    );
    Config::from_str(&toml).expect("test config should validate")
}

/// One synthetic credential
pub fn test_pool() -> Vec<Credential> {
    vec![Credential::new("test-secret").expect("non-blank secret")]
}

/// The JSON shape the remote generation API returns on success
pub fn generation_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {"content": {"parts": [{"text": text}]}}
        ]
    })
}

/// Stub backend returning a fixed reply and counting generate calls
#[derive(Debug)]
pub struct CountingBackend {
    reply: String,
    calls: AtomicUsize,
}

impl CountingBackend {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for CountingBackend {
    async fn generate(&self, _handle: &ResolvedModel, _prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    async fn list_models(&self, _handle: &ResolvedModel) -> AppResult<Vec<String>> {
        Ok(vec!["fast-model".to_string(), "pro-model".to_string()])
    }
}

/// State wired to a stub backend (no network)
pub fn stub_state(backend: Arc<CountingBackend>) -> AppState {
    AppState::with_backend(test_config("http://localhost:1", false), test_pool(), backend)
        .expect("state should build")
}
