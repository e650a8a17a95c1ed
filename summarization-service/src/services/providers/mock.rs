//! In-process gateway for local development and tests.

use super::{ModelGateway, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Only the most recent prompts are kept.
pub const MAX_RECORDED_PROMPTS: usize = 64;

enum MockReply {
    Echo,
    Text(String),
    UpstreamStatus { status: u16, body: String },
}

/// Records the prompts it receives, up to [`MAX_RECORDED_PROMPTS`].
pub struct MockGateway {
    reply: MockReply,
    prompts: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockGateway {
    /// Answers with the prompt it was given.
    pub fn echo() -> Self {
        Self::with_reply(MockReply::Echo)
    }

    /// Always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    /// Always fails as if the upstream returned `status`.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(MockReply::UpstreamStatus {
            status,
            body: body.into(),
        })
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Recorded prompts, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Every call, including those whose prompt was already evicted.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut prompts = self
                .prompts
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if prompts.len() == MAX_RECORDED_PROMPTS {
                prompts.pop_front();
            }
            prompts.push_back(prompt.to_string());
        }

        tracing::info!(prompt_len = prompt.len(), "[MOCK] Prompt would be sent to the model");

        match &self.reply {
            MockReply::Echo => Ok(format!("Mock response for: {}", prompt)),
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::UpstreamStatus { status, body } => Err(ProviderError::UpstreamStatus {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
