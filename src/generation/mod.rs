//! Remote generation invocation
//!
//! One outbound call type: generate text from a prompt string against a named
//! model variant. The remote output is opaque prose; nothing here parses or
//! validates it beyond extracting the text parts. Failures are translated
//! into the small closed taxonomy in [`crate::error::AppError`].
//!
//! The wire format is the Gemini-style REST API: `POST
//! {base}/models/{id}:generateContent` plus a `GET {base}/models` catalog
//! probe. The credential travels in the `x-goog-api-key` header, never in the
//! URL, because transport error strings embed the URL.

use crate::error::{AppError, AppResult};
use crate::resolver::ResolvedModel;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on the error detail carried into a user-facing banner
const MAX_ERROR_DETAIL: usize = 1024;

/// Seam between the translation flow and the remote service
///
/// Allows dependency injection of stub backends in tests, so the cache and
/// retry properties can be checked without network access.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Perform exactly one generation call; returns the response text verbatim
    async fn generate(&self, handle: &ResolvedModel, prompt: &str) -> AppResult<String>;

    /// List remote model variants that support text generation
    async fn list_models(&self, handle: &ResolvedModel) -> AppResult<Vec<String>>;
}

/// Production backend speaking the Gemini-style REST API over reqwest
pub struct HttpGenerationBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGenerationBackend {
    /// Create a backend bound to a base URL with a per-call timeout
    ///
    /// The timeout covers the whole call: connection, request, and body read.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn generate(&self, handle: &ResolvedModel, prompt: &str) -> AppResult<String> {
        let model = handle.model();
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(
            model = %model,
            prompt_length = prompt.len(),
            "Starting generation call"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", handle.credential().expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %model, error = %e, "Transport failure during generation");
                classify_generation_failure(model.as_str(), e.status(), &e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(
                model = %model,
                status = %status,
                "Remote service rejected generation call"
            );
            return Err(classify_generation_failure(
                model.as_str(),
                Some(status),
                &detail,
            ));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!(model = %model, error = %e, "Failed to read generation response body");
            AppError::Unknown(format!("unreadable response from remote service: {}", e))
        })?;

        let text = payload.text();
        if text.is_empty() {
            return Err(AppError::Unknown(
                "remote service returned no text".to_string(),
            ));
        }

        tracing::info!(
            model = %model,
            response_length = text.len(),
            "Generation call completed"
        );
        Ok(text)
    }

    async fn list_models(&self, handle: &ResolvedModel) -> AppResult<Vec<String>> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("x-goog-api-key", handle.credential().expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Transport failure while listing models");
                classify_generation_failure("catalog", e.status(), &e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_generation_failure("catalog", Some(status), &detail));
        }

        let catalog: ModelCatalog = response.json().await.map_err(|e| {
            AppError::Unknown(format!("unreadable model catalog: {}", e))
        })?;

        let names = catalog
            .models
            .into_iter()
            .filter(|entry| {
                entry
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|entry| {
                entry
                    .name
                    .strip_prefix("models/")
                    .unwrap_or(&entry.name)
                    .to_string()
            })
            .collect();
        Ok(names)
    }
}

/// Map a remote failure onto the error taxonomy
///
/// Structured status information wins: HTTP 429 is a rate limit, HTTP 404 is
/// an unavailable model variant, anything else carries its raw detail
/// through. Only when no status is available at all (pure transport errors)
/// does this fall back to inspecting the error text for an embedded status
/// code; that inspection is a last resort, not the primary mechanism.
pub fn classify_generation_failure(
    model: &str,
    status: Option<StatusCode>,
    detail: &str,
) -> AppError {
    match status {
        Some(StatusCode::TOO_MANY_REQUESTS) => AppError::RateLimitExceeded {
            model: model.to_string(),
        },
        Some(StatusCode::NOT_FOUND) => AppError::ModelUnavailable {
            model: model.to_string(),
        },
        Some(status) => AppError::Unknown(format!(
            "remote service returned {}: {}",
            status,
            truncate_detail(detail)
        )),
        None => {
            // Last resort: statusless transport errors sometimes embed the
            // code in their message.
            if detail.contains("429") {
                AppError::RateLimitExceeded {
                    model: model.to_string(),
                }
            } else if detail.contains("404") {
                AppError::ModelUnavailable {
                    model: model.to_string(),
                }
            } else {
                AppError::Unknown(truncate_detail(detail))
            }
        }
    }
}

fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_ERROR_DETAIL {
        detail.to_string()
    } else {
        let truncated: String = detail.chars().take(MAX_ERROR_DETAIL).collect();
        format!("{}…", truncated)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ModelCatalog {
    #[serde(default)]
    models: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}
