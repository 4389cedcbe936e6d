//! Per-session set of providers that have a usable credential.
//!
//! Built fresh for each orchestration session from a credentials map, so
//! no client state is shared process-wide.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{
    AnthropicProvider, GeminiProvider, OpenAiCompatibleProvider, Provider, ProviderError,
    ProviderOverrides, ProviderSpec,
};
use crate::domain::ProviderId;

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}

impl ProviderRegistry {
    /// A registry with no providers; every call goes to the offline generator
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap already-constructed providers
    pub fn with_providers(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Build HTTP providers for every id whose credential resolves.
    ///
    /// Explicit `credentials` win over the process environment. Providers
    /// without a credential are left out of the registry.
    pub fn from_credentials(
        credentials: &HashMap<ProviderId, String>,
        overrides: &HashMap<ProviderId, ProviderOverrides>,
        timeout: Duration,
    ) -> Self {
        Self::from_credentials_with(credentials, overrides, timeout, |var| std::env::var(var).ok())
    }

    /// Like [`Self::from_credentials`] with an injectable environment lookup
    pub fn from_credentials_with<E>(
        credentials: &HashMap<ProviderId, String>,
        overrides: &HashMap<ProviderId, ProviderOverrides>,
        timeout: Duration,
        env: E,
    ) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        for id in ProviderId::ALL {
            let Some(api_key) = resolve_credential(id, credentials.get(&id).map(String::as_str), &env)
            else {
                debug!(provider = %id, "No credential, provider excluded");
                continue;
            };

            let spec = ProviderSpec::defaults(id, timeout)
                .with_overrides(overrides.get(&id).unwrap_or(&ProviderOverrides::default()));

            match build_provider(id, api_key, spec) {
                Ok(provider) => providers.push(provider),
                Err(e) => warn!(provider = %id, error = %e, "Failed to construct provider client"),
            }
        }

        Self { providers }
    }

    /// Ids of registered providers in registration order
    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn is_configured(&self, id: ProviderId) -> bool {
        self.providers.iter().any(|p| p.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered providers with `preferred` first, then fixed fallback order
    pub fn ordered(&self, preferred: ProviderId) -> Vec<Arc<dyn Provider>> {
        ProviderId::fallback_order(preferred)
            .into_iter()
            .flat_map(|id| self.providers.iter().filter(move |p| p.id() == id))
            .cloned()
            .collect()
    }
}

/// Resolve a provider's credential: explicit value, else environment.
///
/// Blank values count as absent at both tiers.
pub fn resolve_credential<E>(id: ProviderId, explicit: Option<&str>, env: E) -> Option<String>
where
    E: Fn(&str) -> Option<String>,
{
    explicit
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| {
            env(id.env_var())
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        })
}

fn build_provider(
    id: ProviderId,
    api_key: String,
    spec: ProviderSpec,
) -> Result<Arc<dyn Provider>, ProviderError> {
    Ok(match id {
        ProviderId::Groq | ProviderId::OpenAi => {
            Arc::new(OpenAiCompatibleProvider::new(id, api_key, spec)?)
        }
        ProviderId::Claude => Arc::new(AnthropicProvider::new(api_key, spec)?),
        ProviderId::Gemini => Arc::new(GeminiProvider::new(api_key, spec)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Named(ProviderId);

    #[async_trait]
    impl Provider for Named {
        fn id(&self) -> ProviderId {
            self.0
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_explicit_credential_wins_over_env() {
        let env = |var: &str| (var == "GROQ_API_KEY").then(|| "env-key".to_string());

        assert_eq!(
            resolve_credential(ProviderId::Groq, Some("runtime-key"), env),
            Some("runtime-key".to_string())
        );
        assert_eq!(
            resolve_credential(ProviderId::Groq, None, env),
            Some("env-key".to_string())
        );
        assert_eq!(
            resolve_credential(ProviderId::Groq, Some("   "), env),
            Some("env-key".to_string())
        );
        assert_eq!(resolve_credential(ProviderId::OpenAi, None, env), None);
    }

    #[test]
    fn test_registry_excludes_unconfigured_providers() {
        let credentials = HashMap::from([
            (ProviderId::Claude, "sk-ant".to_string()),
            (ProviderId::OpenAi, "".to_string()),
        ]);
        let env = |var: &str| (var == "GOOGLE_API_KEY").then(|| "AIza".to_string());

        let registry = ProviderRegistry::from_credentials_with(
            &credentials,
            &HashMap::new(),
            Duration::from_secs(5),
            env,
        );

        assert_eq!(registry.ids(), vec![ProviderId::Claude, ProviderId::Gemini]);
        assert!(!registry.is_configured(ProviderId::OpenAi));
    }

    #[test]
    fn test_registry_without_credentials_is_empty() {
        let registry = ProviderRegistry::from_credentials_with(
            &HashMap::new(),
            &HashMap::new(),
            Duration::from_secs(5),
            no_env,
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ordered_puts_preferred_first() {
        let named = |id| Arc::new(Named(id)) as Arc<dyn Provider>;
        let registry = ProviderRegistry::with_providers(vec![
            named(ProviderId::Gemini),
            named(ProviderId::Groq),
            named(ProviderId::Claude),
        ]);

        let order: Vec<ProviderId> = registry
            .ordered(ProviderId::Gemini)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(
            order,
            vec![ProviderId::Gemini, ProviderId::Groq, ProviderId::Claude]
        );

        // Preferred provider without a credential is simply skipped
        let order: Vec<ProviderId> = registry
            .ordered(ProviderId::OpenAi)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(
            order,
            vec![ProviderId::Groq, ProviderId::Claude, ProviderId::Gemini]
        );
    }
}
