//! Adapter interfaces for text-generation providers.
//!
//! Every provider implements [`Provider`]: accept a prompt, return raw
//! text, or fail with a [`ProviderError`]. The [`ProviderRegistry`] holds
//! the providers that have a credential for one session; the
//! [`OfflineGenerator`] is the deterministic last resort.

pub mod anthropic;
pub mod gemini;
pub mod offline;
pub mod openai;
pub mod registry;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::ProviderId;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use offline::{OfflineGenerator, Template};
pub use openai::OpenAiCompatibleProvider;
pub use registry::ProviderRegistry;

/// Suffix appended by providers without a native JSON response mode
pub const JSON_ONLY_SUFFIX: &str = "Output only valid JSON, no markdown.";

/// Longest error body kept in a [`ProviderError::Status`]
const MAX_ERROR_BODY: usize = 500;

/// Per-provider call failure. Always recovered inside the fallback walk.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("model '{model}' is not available")]
    ModelUnavailable { model: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no models configured")]
    NoModels,
}

/// Trait for text-generation providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which provider this is
    fn id(&self) -> ProviderId;

    /// Send `prompt` and return the raw text reply
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Per-provider overrides as they appear in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOverrides {
    pub model: Option<String>,
    pub alternate_models: Option<Vec<String>>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Resolved call settings for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    /// Requested model first, then acceptable alternates
    pub models: Vec<String>,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ProviderSpec {
    /// Built-in settings for a provider
    pub fn defaults(id: ProviderId, timeout: Duration) -> Self {
        let (model, alternates, base_url): (&str, &[&str], &str) = match id {
            ProviderId::Groq => ("llama-3.3-70b-versatile", &[], "https://api.groq.com/openai/v1"),
            ProviderId::OpenAi => ("gpt-4o", &[], "https://api.openai.com/v1"),
            ProviderId::Claude => ("claude-3-5-sonnet-20241022", &[], "https://api.anthropic.com"),
            ProviderId::Gemini => (
                "gemini-2.0-flash",
                &["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-flash-latest"],
                "https://generativelanguage.googleapis.com",
            ),
        };

        let mut models = vec![model.to_string()];
        models.extend(alternates.iter().map(|m| m.to_string()));
        dedup_models(&mut models);

        Self {
            models,
            base_url: base_url.to_string(),
            max_tokens: 4096,
            timeout,
        }
    }

    /// Apply config overrides on top of these settings
    pub fn with_overrides(mut self, overrides: &ProviderOverrides) -> Self {
        if let Some(ref model) = overrides.model {
            self.models[0] = model.clone();
        }
        if let Some(ref alternates) = overrides.alternate_models {
            self.models.truncate(1);
            self.models.extend(alternates.iter().cloned());
        }
        dedup_models(&mut self.models);
        if let Some(ref base_url) = overrides.base_url {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        self
    }

    /// The model asked for first
    pub fn primary_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or_default()
    }
}

fn dedup_models(models: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    models.retain(|m| !m.is_empty() && seen.insert(m.clone()));
}

/// Try each model in order, moving on only when the model is unavailable.
///
/// Any other error fails the provider immediately.
pub async fn with_model_fallback<F, Fut>(
    provider: ProviderId,
    models: &[String],
    mut call: F,
) -> Result<String, ProviderError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, ProviderError>>,
{
    let mut last_error = None;

    for model in models {
        match call(model.clone()).await {
            Ok(text) => return Ok(text),
            Err(ProviderError::ModelUnavailable { model }) => {
                warn!(%provider, %model, "Model not available, trying next candidate");
                last_error = Some(ProviderError::ModelUnavailable { model });
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or(ProviderError::NoModels))
}

/// Build an HTTP client bounded by the per-call timeout
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Send a JSON request and decode the JSON reply.
///
/// A 404 is reported as the model being unavailable.
pub(crate) async fn send_json(
    request: reqwest::RequestBuilder,
    model: &str,
) -> Result<serde_json::Value, ProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if status.as_u16() == 404 {
        return Err(ProviderError::ModelUnavailable {
            model: model.to_string(),
        });
    }

    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}
