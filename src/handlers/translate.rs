//! Translation endpoint handler
//!
//! Handles POST /translate: resolve a model handle, interpolate the passage
//! into the instruction template, invoke the remote generation call once, and
//! memoize the result by the exact passage string.

use crate::cache::CacheOutcome;
use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::resolver::{ExclusionSet, ModelId, ResolvedModel};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum allowed passage length in characters
const MAX_PASSAGE_LENGTH: usize = 20_000;

/// Translation request from the page
///
/// Validation is enforced during deserialization - invalid instances cannot exist.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    passage: String,
}

impl TranslateRequest {
    /// Get the submitted passage
    pub fn passage(&self) -> &str {
        &self.passage
    }
}

impl<'de> Deserialize<'de> for TranslateRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawTranslateRequest {
            passage: String,
        }

        let raw = RawTranslateRequest::deserialize(deserializer)?;

        if raw.passage.trim().is_empty() {
            return Err(serde::de::Error::custom(
                "passage cannot be empty or contain only whitespace",
            ));
        }

        // Count Unicode characters, not bytes; Pali romanization is multi-byte.
        let char_count = raw.passage.chars().count();
        if char_count > MAX_PASSAGE_LENGTH {
            return Err(serde::de::Error::custom(format!(
                "passage exceeds maximum length of {} characters (got {})",
                MAX_PASSAGE_LENGTH, char_count
            )));
        }

        Ok(TranslateRequest {
            passage: raw.passage,
        })
    }
}

/// Translation response rendered into the result area
///
/// Fields are private to enforce construction through `new()`, which ties
/// `model` to the handle that actually served the request.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateResponse {
    /// Remote service output, passed through verbatim
    translation: String,
    /// Model variant that produced (or originally produced) the text
    model: String,
    /// True when served from the in-process cache without a remote call
    cached: bool,
}

impl TranslateResponse {
    pub fn new(translation: String, model: &ModelId, cached: bool) -> Self {
        Self {
            translation,
            model: model.as_str().to_string(),
            cached,
        }
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn cached(&self) -> bool {
        self.cached
    }
}

/// POST /translate handler
///
/// One blocking remote call per submission (the page shows a busy indicator
/// for the duration); an exact repeat of an earlier passage is answered from
/// the cache instead. All failures surface as a JSON error banner and leave
/// the process able to serve the next attempt.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    tracing::debug!(
        request_id = %request_id,
        passage_length = request.passage().len(),
        "Received translation request"
    );

    // Selection is re-attempted independently on every call; no session
    // binding survives this handler.
    let resolved = state.resolver().resolve()?;
    let prompt = state.template().render(request.passage());

    let mut served_model = resolved.model().clone();
    let outcome = if state.config().cache.enabled {
        state
            .cache()
            .get_or_compute(request.passage(), || {
                invoke_generation(&state, request_id, &resolved, &prompt, &mut served_model)
            })
            .await?
    } else {
        let text =
            invoke_generation(&state, request_id, &resolved, &prompt, &mut served_model).await?;
        CacheOutcome::fresh(text)
    };

    tracing::info!(
        request_id = %request_id,
        model = %served_model,
        cached = outcome.hit(),
        response_length = outcome.text().len(),
        "Translation request completed"
    );

    let cached = outcome.hit();
    Ok(Json(TranslateResponse::new(
        outcome.into_text(),
        &served_model,
        cached,
    )))
}

/// Invoke the remote call, with at most one advance-to-next-preference retry
///
/// Retry after a model-unavailable failure is a no-op unless
/// `models.retry_on_unavailable` is set; when it is, the failed model goes
/// into an exclusion set and resolution runs once more, so a deterministic
/// strategy cannot loop on the same dead variant.
async fn invoke_generation(
    state: &AppState,
    request_id: RequestId,
    resolved: &ResolvedModel,
    prompt: &str,
    served_model: &mut ModelId,
) -> AppResult<String> {
    match state.backend().generate(resolved, prompt).await {
        Ok(text) => Ok(text),
        Err(err)
            if err.is_model_unavailable() && state.config().models.retry_on_unavailable() =>
        {
            tracing::warn!(
                request_id = %request_id,
                model = %resolved.model(),
                "Model unavailable, advancing to next preference (single retry)"
            );

            let mut exclude = ExclusionSet::new();
            exclude.insert(resolved.model().clone());
            let fallback = state.resolver().resolve_excluding(&exclude)?;
            *served_model = fallback.model().clone();

            state.backend().generate(&fallback, prompt).await
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                model = %resolved.model(),
                error = %err,
                "Generation failed"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_deserializes() {
        let json = r#"{"passage": "Sabbe satta bhavantu sukhitatta"}"#;
        let req: TranslateRequest = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(req.passage(), "Sabbe satta bhavantu sukhitatta");
    }

    #[test]
    fn test_translate_request_rejects_empty_passage() {
        let json = r#"{"passage": ""}"#;
        let result = serde_json::from_str::<TranslateRequest>(json);

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("empty") || err_msg.contains("whitespace"),
            "error message should mention empty or whitespace, got: {}",
            err_msg
        );
    }

    #[test]
    fn test_translate_request_rejects_whitespace_only_passage() {
        let json = r#"{"passage": "  \n\t "}"#;
        let result = serde_json::from_str::<TranslateRequest>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_translate_request_rejects_passage_too_long() {
        let long_passage = "a".repeat(MAX_PASSAGE_LENGTH + 1);
        let json = format!(r#"{{"passage": "{}"}}"#, long_passage);
        let result = serde_json::from_str::<TranslateRequest>(&json);

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("exceeds maximum length"),
            "error message should mention exceeds maximum length, got: {}",
            err_msg
        );
    }

    #[test]
    fn test_translate_request_counts_characters_not_bytes() {
        // Romanized Pali diacritics are multi-byte; the limit is characters.
        let passage = "ā".repeat(MAX_PASSAGE_LENGTH);
        let json = format!(r#"{{"passage": "{}"}}"#, passage);
        let result = serde_json::from_str::<TranslateRequest>(&json);
        assert!(
            result.is_ok(),
            "{} two-byte chars should be accepted. Error: {:?}",
            MAX_PASSAGE_LENGTH,
            result.err()
        );

        let over = "ā".repeat(MAX_PASSAGE_LENGTH + 1);
        let json = format!(r#"{{"passage": "{}"}}"#, over);
        assert!(serde_json::from_str::<TranslateRequest>(&json).is_err());
    }

    #[test]
    fn test_translate_response_serializes() {
        let model = ModelId::parse("fast-model").expect("valid identifier");
        let resp = TranslateResponse::new("May all beings be happy.".to_string(), &model, false);

        let json = serde_json::to_string(&resp).expect("should serialize");
        assert!(json.contains("\"translation\":\"May all beings be happy.\""));
        assert!(json.contains("\"model\":\"fast-model\""));
        assert!(json.contains("\"cached\":false"));
    }

    #[test]
    fn test_translate_response_accessors() {
        let model = ModelId::parse("pro-model").expect("valid identifier");
        let resp = TranslateResponse::new("text".to_string(), &model, true);
        assert_eq!(resp.translation(), "text");
        assert_eq!(resp.model(), "pro-model");
        assert!(resp.cached());
    }
}
