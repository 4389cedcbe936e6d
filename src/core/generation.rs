//! Generation client: ordered provider fallback with an offline safety valve.
//!
//! Providers are tried strictly one at a time, preferred first, then the
//! fixed enumeration order. A provider error or timeout is logged and the
//! walk moves on; the first success returns immediately. When nothing
//! succeeds the offline generator answers, so a caller always gets text.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::adapters::{OfflineGenerator, ProviderError, ProviderRegistry};
use crate::domain::{DesignSystem, ProviderId};

use super::prompt::extract_request;

/// Where a piece of generated text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Provider(ProviderId),
    Offline,
}

/// Raw text plus its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub source: GenerationSource,
}

#[derive(Debug, Clone)]
pub struct GenerationClient {
    registry: Arc<ProviderRegistry>,
    offline: OfflineGenerator,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(registry: Arc<ProviderRegistry>, design: Arc<DesignSystem>, timeout: Duration) -> Self {
        Self {
            registry,
            offline: OfflineGenerator::new(design),
            timeout,
        }
    }

    /// Raw text for `prompt`; never fails
    pub async fn generate(&self, prompt: &str, preferred: ProviderId) -> String {
        self.generate_traced(prompt, preferred).await.text
    }

    /// Like [`Self::generate`], also reporting which source answered
    pub async fn generate_traced(&self, prompt: &str, preferred: ProviderId) -> Generated {
        self.generate_for(prompt, extract_request(prompt), preferred).await
    }

    /// Send `prompt` to the providers; the offline generator answers
    /// `request` when none of them succeeds.
    ///
    /// Corrective prompts do not carry the user's request, so callers
    /// retrying a request pass it separately.
    #[instrument(skip(self, prompt, request), fields(preferred = %preferred))]
    pub async fn generate_for(&self, prompt: &str, request: &str, preferred: ProviderId) -> Generated {
        for provider in self.registry.ordered(preferred) {
            let id = provider.id();
            info!(provider = %id, "Calling {}", id.display_name());
            let started = Instant::now();

            let result = match tokio::time::timeout(self.timeout, provider.generate(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.timeout)),
            };

            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            match result {
                Ok(text) => {
                    info!(provider = %id, duration_ms, "Provider responded");
                    return Generated {
                        text,
                        source: GenerationSource::Provider(id),
                    };
                }
                Err(e) => {
                    warn!(provider = %id, duration_ms, error = %e, "Provider failed, trying next");
                }
            }
        }

        info!("No provider produced output, falling back to offline generator");
        Generated {
            text: self.offline.generate_for_request(request),
            source: GenerationSource::Offline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_registry_uses_offline() {
        let client = GenerationClient::new(
            Arc::new(ProviderRegistry::empty()),
            Arc::new(DesignSystem::default()),
            Duration::from_secs(1),
        );

        let generated = client
            .generate_traced("USER REQUEST: a navbar", ProviderId::Groq)
            .await;

        assert_eq!(generated.source, GenerationSource::Offline);
        assert!(generated.text.contains("NavbarComponent"));
    }

    #[tokio::test]
    async fn test_offline_uses_request_passed_alongside_prompt() {
        let client = GenerationClient::new(
            Arc::new(ProviderRegistry::empty()),
            Arc::new(DesignSystem::default()),
            Duration::from_secs(1),
        );

        let generated = client
            .generate_for("ERRORS:\n- Missing component part: css", "a stats dashboard", ProviderId::Groq)
            .await;

        assert_eq!(generated.source, GenerationSource::Offline);
        assert!(generated.text.contains("DashboardComponent"));
    }
}
