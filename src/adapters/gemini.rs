//! Google Gemini `generateContent` provider.
//!
//! Gemini model names churn, so the default settings carry a list of
//! acceptable alternates that are tried when a model 404s.

use async_trait::async_trait;
use tracing::debug;

use super::{
    http_client, send_json, with_model_fallback, Provider, ProviderError, ProviderSpec,
    JSON_ONLY_SUFFIX,
};
use crate::domain::ProviderId;

pub struct GeminiProvider {
    api_key: String,
    spec: ProviderSpec,
    http: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, spec: ProviderSpec) -> Result<Self, ProviderError> {
        let http = http_client(spec.timeout)?;
        Ok(Self { api_key, spec, http })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [{ "text": format!("{}\n{}", prompt, JSON_ONLY_SUFFIX) }]
            }]
        })
    }

    async fn call_model(&self, prompt: &str, model: String) -> Result<String, ProviderError> {
        debug!(%model, "Calling Gemini generateContent");
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.spec.base_url, model
        );

        let request = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request_body(prompt));

        let reply = send_json(request, &model).await?;
        parse_response(&reply)
    }
}

/// Concatenate the text parts of the first candidate
fn parse_response(reply: &serde_json::Value) -> Result<String, ProviderError> {
    let parts = reply["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| ProviderError::InvalidResponse("missing candidates[0].content.parts".to_string()))?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() {
        return Err(ProviderError::InvalidResponse("empty candidate text".to_string()));
    }

    Ok(text)
}

#[async_trait]
impl Provider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        with_model_fallback(ProviderId::Gemini, &self.spec.models, |model| {
            self.call_model(prompt, model)
        })
        .await
    }
}
