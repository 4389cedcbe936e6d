//! Shared test providers.
//!
//! Scripted in-process providers so the attempt loop can be driven
//! without network access.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use component_architect::adapters::{Provider, ProviderError};
use component_architect::ProviderId;

/// Replies with a fixed script, recording every prompt it receives.
/// Once the script runs out the last reply repeats.
pub struct ScriptedProvider {
    id: ProviderId,
    replies: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(id: ProviderId, replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Always answers with `reply`
    pub fn always(id: ProviderId, reply: &str) -> Arc<Self> {
        Self::new(id, vec![Ok(reply.to_string())])
    }

    /// Always fails
    pub fn failing(id: ProviderId) -> Arc<Self> {
        Self::new(id, vec![Err("HTTP 500".to_string())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.replies.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err("script empty".to_string())),
        };

        reply.map_err(|body| ProviderError::Status { status: 500, body })
    }
}

/// Never answers within any sensible timeout
pub struct StalledProvider {
    pub id: ProviderId,
}

#[async_trait]
impl Provider for StalledProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

/// A JSON reply with the given parts
pub fn reply(html: &str, css: &str, typescript: &str) -> String {
    serde_json::json!({ "html": html, "css": css, "typescript": typescript }).to_string()
}

/// Erase a scripted provider for registry construction
pub fn erased(provider: &Arc<ScriptedProvider>) -> Arc<dyn Provider> {
    provider.clone()
}
