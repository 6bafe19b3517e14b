//! Shared test helpers and stub completion service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;

use companion::error::{CompanionError, Result};
use companion::provider::{Completion, CompletionRequest, CompletionService};
use companion::types::{FinishReason, Fragment};

/// What the stub does for the next request.
pub enum Reply {
    /// Non-streamed text, or one fragment per char chunk when streaming.
    Text(String),
    /// Exact fragments to stream; `None` entries carry no delta.
    Fragments(Vec<Option<String>>),
    /// Fail before any output.
    Fail(String),
    /// Stream these fragments, then fail.
    FailMidStream(Vec<String>, String),
}

/// A stub service that returns queued replies and records requests.
#[derive(Default)]
pub struct StubService {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn queue_text(&self, text: &str) -> &Self {
        self.queue(Reply::Text(text.to_string()))
    }

    pub fn queue_fragments(&self, fragments: &[&str]) -> &Self {
        self.queue(Reply::Fragments(
            fragments.iter().map(|f| Some(f.to_string())).collect(),
        ))
    }

    pub fn queue_failure(&self, message: &str) -> &Self {
        self.queue(Reply::Fail(message.to_string()))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn next_reply(&self, request: &CompletionRequest) -> Reply {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Text("Stub response".to_string()))
    }
}

#[async_trait]
impl CompletionService for StubService {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        match self.next_reply(request) {
            Reply::Text(text) => Ok(Completion {
                text,
                finish_reason: Some(FinishReason::Stop),
            }),
            Reply::Fragments(fragments) => Ok(Completion {
                text: fragments.into_iter().flatten().collect(),
                finish_reason: Some(FinishReason::Stop),
            }),
            Reply::Fail(message) | Reply::FailMidStream(_, message) => {
                Err(CompanionError::api(500, message))
            }
        }
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<Fragment>>> {
        let items: Vec<Result<Fragment>> = match self.next_reply(request) {
            Reply::Text(text) => text
                .chars()
                .collect::<Vec<_>>()
                .chunks(5)
                .map(|chunk| Ok(Fragment::text(chunk.iter().collect::<String>())))
                .chain(std::iter::once(Ok(Fragment::finished(FinishReason::Stop))))
                .collect(),
            Reply::Fragments(fragments) => fragments
                .into_iter()
                .map(|delta| {
                    Ok(Fragment {
                        delta,
                        finish_reason: None,
                    })
                })
                .collect(),
            Reply::Fail(message) => return Err(CompanionError::api(503, message)),
            Reply::FailMidStream(fragments, message) => fragments
                .into_iter()
                .map(|f| Ok(Fragment::text(f)))
                .chain(std::iter::once(Err(CompanionError::Stream(message))))
                .collect(),
        };
        Ok(Box::pin(futures::stream::iter(items)))
    }
}
