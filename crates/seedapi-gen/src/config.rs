use std::time::Duration;

use crate::error::{GenError, GenResult};
use crate::model::ModelId;
use crate::retry::RetryPolicy;

/// Configuration shared by the provider backends.
#[derive(Clone)]
pub struct GeneratorConfig {
    pub model: ModelId,
    pub api_key: String,
    /// Provider API root; `None` means the provider's public endpoint.
    pub base_url: Option<String>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Output token cap for providers that require one.
    pub max_tokens: u32,
}

impl GeneratorConfig {
    pub fn new(model: ModelId, api_key: impl Into<String>) -> Self {
        Self {
            model,
            api_key: api_key.into(),
            base_url: None,
            timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
            max_tokens: 4096,
        }
    }

    /// Build a configuration with the API key taken from the provider's
    /// environment variable. A missing or empty key is an error.
    pub fn from_env(model: ModelId) -> GenResult<Self> {
        let var = model.provider().api_key_var();
        Self::from_lookup(model, |name| std::env::var(name).ok())
            .ok_or(GenError::MissingCredential(var))
    }

    fn from_lookup(model: ModelId, lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let key = lookup(model.provider().api_key_var())?;
        if key.trim().is_empty() {
            return None;
        }
        Some(Self::new(model, key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The API root requests are sent to, without a trailing slash.
    pub fn endpoint(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.model.provider().default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
