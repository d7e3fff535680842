//! HTTP request handlers for the Palingua API

use crate::cache::AnalysisCache;
use crate::config::Config;
use crate::error::AppResult;
use crate::generation::{GenerationBackend, HttpGenerationBackend};
use crate::prompt::PromptTemplate;
use crate::resolver::{Credential, ModelResolver, build_strategy};
use std::sync::Arc;
use std::time::Duration;

pub mod health;
pub mod models;
pub mod page;
pub mod translate;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers. The resolver
/// is re-consulted per request; there is no session-wide model binding.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    resolver: Arc<ModelResolver>,
    backend: Arc<dyn GenerationBackend>,
    cache: Arc<AnalysisCache>,
    template: Arc<PromptTemplate>,
}

impl AppState {
    /// Create state for production: credentials from the environment,
    /// generation over HTTP against the configured base URL.
    pub fn new(config: Config) -> AppResult<Self> {
        let pool = Credential::pool_from_env(&config.credentials);
        let backend = Arc::new(HttpGenerationBackend::new(
            config.models.base_url(),
            Duration::from_secs(config.server.request_timeout_seconds),
        )?);
        Self::with_backend(config, pool, backend)
    }

    /// Create state with an explicit credential pool and backend
    ///
    /// This is the injection seam: integration tests supply a stub backend or
    /// a wiremock-pointed HTTP backend and a synthetic pool.
    pub fn with_backend(
        config: Config,
        pool: Vec<Credential>,
        backend: Arc<dyn GenerationBackend>,
    ) -> AppResult<Self> {
        let template = PromptTemplate::new(config.prompt.template.clone())?;
        let resolver = ModelResolver::new(
            pool,
            config.models.preference().to_vec(),
            build_strategy(config.credentials.strategy),
        )?;

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            backend,
            cache: Arc::new(AnalysisCache::new()),
            template: Arc::new(template),
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the model resolver
    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    /// Get reference to the generation backend
    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    /// Get reference to the analysis cache
    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Get reference to the prompt template
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}
