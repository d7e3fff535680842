//! Opaque bearer credentials for the remote generation service
//!
//! Credentials are read once from the environment, held in memory for the
//! process lifetime, and never persisted or logged. The `Debug` impl redacts
//! the secret so structured log fields cannot leak it.

use crate::config::CredentialsConfig;

/// An opaque bearer secret for the remote generation service
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
}

impl Credential {
    /// Create a credential from a non-blank secret string
    ///
    /// Returns `None` for blank input; an empty secret would always be
    /// rejected by the remote service, so it never enters the pool.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self { secret })
        }
    }

    /// Expose the secret for transmission to the remote service
    ///
    /// Call sites must put this in a request header only, never in a URL or
    /// a log field. reqwest error strings embed URLs, so a secret in a query
    /// parameter would leak through error messages.
    pub fn expose_secret(&self) -> &str {
        &self.secret
    }

    /// Read the credential pool from the environment variables named in config
    ///
    /// Unset or blank variables are skipped with a warning. An empty result
    /// is allowed; resolution fails per request until the operator fixes the
    /// environment.
    pub fn pool_from_env(config: &CredentialsConfig) -> Vec<Credential> {
        let mut pool = Vec::new();
        for name in &config.env {
            match std::env::var(name) {
                Ok(value) => match Credential::new(value) {
                    Some(credential) => {
                        tracing::debug!(env_var = %name, "Loaded credential from environment");
                        pool.push(credential);
                    }
                    None => {
                        tracing::warn!(env_var = %name, "Environment variable is blank, skipping");
                    }
                },
                Err(_) => {
                    tracing::warn!(env_var = %name, "Environment variable not set, skipping");
                }
            }
        }
        if pool.is_empty() {
            tracing::warn!(
                env_vars = ?config.env,
                "No credentials loaded; translation requests will fail until one is configured"
            );
        }
        pool
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
