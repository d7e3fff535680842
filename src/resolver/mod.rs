//! Model resolution: bind one credential and one model variant per request
//!
//! Given a pool of credentials and an ordered preference list of model
//! identifiers, [`ModelResolver::resolve`] yields a [`ResolvedModel`] handle
//! despite partial unavailability: a missing credential is a recoverable
//! configuration error, and a malformed preference entry only costs its own
//! slot in the walk. Resolution happens fresh on every request; nothing is
//! bound across requests.

mod credential;
mod strategy;

pub use credential::Credential;
pub use strategy::{CredentialStrategy, FirstAvailable, RandomPick, RoundRobin, build_strategy};

use crate::error::{AppError, AppResult};
use std::collections::HashSet;

/// Maximum accepted length for a model identifier
const MAX_MODEL_ID_LENGTH: usize = 128;

/// A validated remote model identifier
///
/// Parsing is the fallible "construction" step of the preference walk:
/// a malformed entry fails here and the resolver advances to the next
/// candidate instead of failing the whole request.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct ModelId(String);

impl ModelId {
    /// Parse and validate a model identifier
    ///
    /// Accepts non-blank strings up to 128 characters made of alphanumerics
    /// and `- . _ /` (the shapes the remote catalog actually uses, e.g.
    /// `gemini-1.5-flash` or `models/gemini-pro`).
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Config("model identifier is blank".to_string()));
        }
        if trimmed.len() > MAX_MODEL_ID_LENGTH {
            return Err(AppError::Config(format!(
                "model identifier exceeds {} characters",
                MAX_MODEL_ID_LENGTH
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/'))
        {
            return Err(AppError::Config(format!(
                "model identifier '{}' contains unsupported characters",
                trimmed
            )));
        }
        // The catalog lists fully-qualified names ("models/gemini-pro");
        // generation URLs want the bare variant name.
        let bare = trimmed.strip_prefix("models/").unwrap_or(trimmed);
        Ok(Self(bare.to_string()))
    }

    /// The bare variant name, without any `models/` prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Models excluded from a resolution walk (e.g. the one that just 404'd)
pub type ExclusionSet = HashSet<ModelId>;

/// A bound, ready-to-invoke handle: one credential plus one model variant
///
/// Stateless beyond the binding; a new one is resolved for every request.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    credential: Credential,
    model: ModelId,
}

impl ResolvedModel {
    fn bind(credential: Credential, model: ModelId) -> Self {
        Self { credential, model }
    }

    /// The credential this handle authenticates with
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The model variant this handle invokes
    pub fn model(&self) -> &ModelId {
        &self.model
    }
}

/// Produces a usable handle to the remote service per request
///
/// Holds the credential pool, the raw preference list, and the selection
/// strategy. The resolver itself has no per-request mutable state; the only
/// cross-request state is inside a `RoundRobin` strategy's counter.
#[derive(Debug)]
pub struct ModelResolver {
    pool: Vec<Credential>,
    preference: Vec<String>,
    strategy: Box<dyn CredentialStrategy>,
}

impl ModelResolver {
    /// Create a resolver
    ///
    /// The preference list must be non-empty. The credential pool may be
    /// empty; that becomes a per-request configuration error rather than a
    /// construction failure, so the service can start and report the problem
    /// in its error banner.
    pub fn new(
        pool: Vec<Credential>,
        preference: Vec<String>,
        strategy: Box<dyn CredentialStrategy>,
    ) -> AppResult<Self> {
        if preference.is_empty() {
            return Err(AppError::Config(
                "model preference list must not be empty".to_string(),
            ));
        }
        Ok(Self {
            pool,
            preference,
            strategy,
        })
    }

    /// Number of credentials currently in the pool
    pub fn credential_count(&self) -> usize {
        self.pool.len()
    }

    /// Resolve a handle, considering every preference entry
    pub fn resolve(&self) -> AppResult<ResolvedModel> {
        self.resolve_excluding(&ExclusionSet::new())
    }

    /// Resolve a handle, skipping models in the exclusion set
    ///
    /// This is the explicit advance-to-next-preference step: after a
    /// model-unavailable failure the caller may retry once with the failed
    /// model excluded. The resolver itself never retries or loops.
    pub fn resolve_excluding(&self, exclude: &ExclusionSet) -> AppResult<ResolvedModel> {
        let credential = self.strategy.select(&self.pool).ok_or_else(|| {
            tracing::warn!("Credential pool is empty, refusing to contact remote service");
            AppError::Config("no credential available".to_string())
        })?;

        for (index, raw) in self.preference.iter().enumerate() {
            let model = match ModelId::parse(raw) {
                Ok(model) => model,
                Err(e) => {
                    tracing::warn!(
                        candidate = %raw,
                        position = index,
                        error = %e,
                        "Preference entry failed construction, advancing to next candidate"
                    );
                    continue;
                }
            };

            if exclude.contains(&model) {
                tracing::debug!(
                    model = %model,
                    position = index,
                    "Skipping excluded model"
                );
                continue;
            }

            tracing::debug!(model = %model, position = index, "Resolved model handle");
            return Ok(ResolvedModel::bind(credential.clone(), model));
        }

        tracing::error!(
            candidates = self.preference.len(),
            excluded = exclude.len(),
            "Every preference entry failed construction or was excluded"
        );
        Err(AppError::NoModelAvailable {
            tried: self.preference.join(", "),
        })
    }
}
