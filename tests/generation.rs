//! Generation Client Integration Tests
//!
//! Tests for the ordered provider fallback walk, per-call timeouts and the
//! offline safety valve.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{erased, ScriptedProvider, StalledProvider};
use component_architect::adapters::Provider;
use component_architect::core::{GenerationClient, GenerationSource, Validator};
use component_architect::{DesignSystem, ProviderId, ProviderRegistry};

fn client(providers: Vec<Arc<dyn Provider>>, timeout: Duration) -> GenerationClient {
    GenerationClient::new(
        Arc::new(ProviderRegistry::with_providers(providers)),
        Arc::new(DesignSystem::from_tokens([("primary-color", "#6d28d9")])),
        timeout,
    )
}

#[tokio::test]
async fn test_preferred_provider_answers_first() {
    let groq = ScriptedProvider::always(ProviderId::Groq, "from groq");
    let gemini = ScriptedProvider::always(ProviderId::Gemini, "from gemini");
    let client = client(vec![erased(&groq), erased(&gemini)], Duration::from_secs(5));

    let generated = client.generate_traced("prompt", ProviderId::Gemini).await;

    assert_eq!(generated.text, "from gemini");
    assert_eq!(generated.source, GenerationSource::Provider(ProviderId::Gemini));
    assert_eq!(gemini.calls(), 1);
    assert_eq!(groq.calls(), 0);
}

#[tokio::test]
async fn test_failure_falls_through_in_fixed_order() {
    let groq = ScriptedProvider::always(ProviderId::Groq, "from groq");
    let openai = ScriptedProvider::always(ProviderId::OpenAi, "from openai");
    let claude = ScriptedProvider::failing(ProviderId::Claude);
    let client = client(
        vec![erased(&openai), erased(&claude), erased(&groq)],
        Duration::from_secs(5),
    );

    // claude preferred and failing; groq precedes openai in the fixed order
    let text = client.generate("prompt", ProviderId::Claude).await;

    assert_eq!(text, "from groq");
    assert_eq!(claude.calls(), 1);
    assert_eq!(groq.calls(), 1);
    assert_eq!(openai.calls(), 0);
}

#[tokio::test]
async fn test_all_providers_failing_uses_offline() {
    let groq = ScriptedProvider::failing(ProviderId::Groq);
    let claude = ScriptedProvider::failing(ProviderId::Claude);
    let client = client(vec![erased(&groq), erased(&claude)], Duration::from_secs(5));

    let generated = client
        .generate_traced("...\nUSER REQUEST: a signup form", ProviderId::Groq)
        .await;

    assert_eq!(generated.source, GenerationSource::Offline);
    assert!(generated.text.contains("RegisterComponent"));
    assert_eq!(groq.calls(), 1);
    assert_eq!(claude.calls(), 1);

    // The offline output always satisfies validation
    let design = DesignSystem::from_tokens([("primary-color", "#6d28d9")]);
    assert!(Validator::new(&design).validate(&generated.text).is_valid());
}

#[tokio::test]
async fn test_stalled_provider_times_out() {
    let stalled: Arc<dyn Provider> = Arc::new(StalledProvider {
        id: ProviderId::OpenAi,
    });
    let gemini = ScriptedProvider::always(ProviderId::Gemini, "from gemini");
    let client = client(vec![stalled, erased(&gemini)], Duration::from_millis(50));

    let started = std::time::Instant::now();
    let generated = client.generate_traced("prompt", ProviderId::OpenAi).await;

    assert_eq!(generated.source, GenerationSource::Provider(ProviderId::Gemini));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_same_prompt_reaches_each_provider() {
    let groq = ScriptedProvider::failing(ProviderId::Groq);
    let openai = ScriptedProvider::always(ProviderId::OpenAi, "ok");
    let client = client(vec![erased(&groq), erased(&openai)], Duration::from_secs(5));

    client.generate("exact prompt", ProviderId::Groq).await;

    assert_eq!(groq.prompts(), vec!["exact prompt"]);
    assert_eq!(openai.prompts(), vec!["exact prompt"]);
}
