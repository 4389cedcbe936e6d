//! OpenAI-compatible chat completions provider.
//!
//! Serves both OpenAI and Groq, which expose the same
//! `/chat/completions` API with a JSON response mode.

use async_trait::async_trait;
use tracing::debug;

use super::{http_client, send_json, with_model_fallback, Provider, ProviderError, ProviderSpec};
use crate::domain::ProviderId;

pub struct OpenAiCompatibleProvider {
    id: ProviderId,
    api_key: String,
    spec: ProviderSpec,
    http: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(id: ProviderId, api_key: String, spec: ProviderSpec) -> Result<Self, ProviderError> {
        let http = http_client(spec.timeout)?;
        Ok(Self {
            id,
            api_key,
            spec,
            http,
        })
    }

    fn build_request_body(&self, prompt: &str, model: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": { "type": "json_object" },
        })
    }

    async fn call_model(&self, prompt: &str, model: String) -> Result<String, ProviderError> {
        debug!(provider = %self.id, %model, "Calling chat completions");
        let url = format!("{}/chat/completions", self.spec.base_url);

        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(prompt, &model));

        let reply = send_json(request, &model).await?;
        parse_response(&reply)
    }
}

/// Pull the first choice's message text out of a completion reply
fn parse_response(reply: &serde_json::Value) -> Result<String, ProviderError> {
    reply["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::InvalidResponse("missing choices[0].message.content".to_string()))
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        with_model_fallback(self.id, &self.spec.models, |model| self.call_model(prompt, model)).await
    }
}
