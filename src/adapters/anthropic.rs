//! Anthropic Messages API provider.

use async_trait::async_trait;
use tracing::debug;

use super::{
    http_client, send_json, with_model_fallback, Provider, ProviderError, ProviderSpec,
    JSON_ONLY_SUFFIX,
};
use crate::domain::ProviderId;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    spec: ProviderSpec,
    http: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, spec: ProviderSpec) -> Result<Self, ProviderError> {
        let http = http_client(spec.timeout)?;
        Ok(Self { api_key, spec, http })
    }

    fn build_request_body(&self, prompt: &str, model: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "max_tokens": self.spec.max_tokens,
            "messages": [{
                "role": "user",
                "content": format!("{}\n\n{}", prompt, JSON_ONLY_SUFFIX),
            }],
        })
    }

    async fn call_model(&self, prompt: &str, model: String) -> Result<String, ProviderError> {
        debug!(%model, "Calling Anthropic messages");
        let url = format!("{}/v1/messages", self.spec.base_url);

        let request = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request_body(prompt, &model));

        let reply = send_json(request, &model).await?;
        parse_response(&reply)
    }
}

/// First text block of a Messages reply
fn parse_response(reply: &serde_json::Value) -> Result<String, ProviderError> {
    reply["content"]
        .as_array()
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b["type"] == "text")
                .and_then(|b| b["text"].as_str())
        })
        .map(str::to_string)
        .ok_or_else(|| ProviderError::InvalidResponse("no text block in content".to_string()))
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Claude
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        with_model_fallback(ProviderId::Claude, &self.spec.models, |model| {
            self.call_model(prompt, model)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_body_appends_json_instruction() {
        let spec = ProviderSpec::defaults(ProviderId::Claude, Duration::from_secs(5));
        let provider = AnthropicProvider::new("k".to_string(), spec).unwrap();
        let body = provider.build_request_body("a navbar", "claude-3-5-sonnet-20241022");

        assert_eq!(body["max_tokens"], 4096);
        let content = body["messages"][0]["content"].as_str().unwrap();
        assert!(content.starts_with("a navbar"));
        assert!(content.ends_with(JSON_ONLY_SUFFIX));
    }

    #[test]
    fn test_parse_response_skips_non_text_blocks() {
        let reply = serde_json::json!({
            "content": [
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "{}" }
            ]
        });
        assert_eq!(parse_response(&reply).unwrap(), "{}");
        assert!(parse_response(&serde_json::json!({})).is_err());
    }
}
