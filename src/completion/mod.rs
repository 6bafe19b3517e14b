//! The request/response loop for one turn.

pub mod events;

pub use events::{TurnEvent, TurnOutcome, TurnState, FALLBACK_MESSAGE};

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::{CompanionError, Result};
use crate::provider::{CompletionRequest, CompletionService};
use crate::session::SessionStore;
use crate::settings::Settings;
use crate::types::{Fragment, Message};

/// Lazy, finite, single-use stream of events for one turn.
///
/// Dropping it before the terminal event abandons the turn: nothing is
/// appended for the assistant and the store is free for the next turn.
pub type TurnStream<'a> = BoxStream<'a, TurnEvent>;

/// Sends a session's conversation to a completion service and records the
/// assistant's answer.
#[derive(Clone)]
pub struct CompletionLoop {
    service: Arc<dyn CompletionService>,
}

impl CompletionLoop {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<dyn CompletionService> {
        &self.service
    }

    /// Build the outgoing request: the system prompt first, then the
    /// conversation in order.
    pub fn build_request(conversation: &[Message], settings: &Settings) -> CompletionRequest {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(settings.system_prompt.clone()));
        messages.extend(conversation.iter().cloned());

        CompletionRequest::builder()
            .model(settings.model)
            .messages(messages)
            .stream(settings.stream)
            .temperature(settings.temperature)
            .max_tokens(settings.max_tokens)
            .build()
    }

    /// Run one turn against the current conversation.
    ///
    /// The stream holds the store's exclusive borrow until it is dropped, so
    /// a second turn cannot start on the same session while this one runs.
    pub fn run<'a>(&'a self, store: &'a mut SessionStore) -> TurnStream<'a> {
        let request = Self::build_request(store.conversation(), store.settings());
        let session = store.id();

        let stream = async_stream::stream! {
            debug!(
                %session,
                model = request.model.as_str(),
                stream = request.stream,
                messages = request.messages.len(),
                "turn started"
            );
            yield TurnEvent::Started;

            let result: Result<String> = if request.stream {
                match self.service.stream(&request).await {
                    Err(e) => Err(e),
                    Ok(mut fragments) => {
                        let mut buffer = String::new();
                        let mut failure = None;
                        while let Some(item) = fragments.next().await {
                            match item {
                                Ok(Fragment { delta: Some(delta), .. }) if !delta.is_empty() => {
                                    buffer.push_str(&delta);
                                    yield TurnEvent::Partial { text: buffer.clone() };
                                }
                                Ok(_) => {}
                                Err(e) => {
                                    failure = Some(e);
                                    break;
                                }
                            }
                        }
                        match failure {
                            Some(e) => Err(e),
                            None => Ok(buffer),
                        }
                    }
                }
            } else {
                self.service.complete(&request).await.map(|c| c.text)
            };

            let result = result.and_then(|text| {
                if text.is_empty() {
                    Err(CompanionError::Stream("model returned no text".into()))
                } else {
                    Ok(text)
                }
            });

            match result {
                Ok(text) => {
                    if let Err(e) = store.append(Message::assistant(text.clone())) {
                        warn!(%session, error = %e, "could not record assistant message");
                    }
                    debug!(%session, chars = text.len(), "turn completed");
                    yield TurnEvent::Completed { text };
                }
                Err(error) => {
                    warn!(%session, error = %error, "turn failed");
                    if let Err(e) = store.append(Message::assistant(FALLBACK_MESSAGE)) {
                        warn!(%session, error = %e, "could not record fallback message");
                    }
                    yield TurnEvent::Failed {
                        error,
                        fallback: FALLBACK_MESSAGE.to_string(),
                    };
                }
            }
        };

        Box::pin(stream)
    }

    /// Drive a turn to the end, calling `on_update` with the running buffer
    /// after each streamed fragment.
    pub async fn complete_turn(
        &self,
        store: &mut SessionStore,
        mut on_update: impl FnMut(&str),
    ) -> TurnOutcome {
        let mut turn = self.run(store);
        while let Some(event) = turn.next().await {
            match event {
                TurnEvent::Started => {}
                TurnEvent::Partial { text } => on_update(&text),
                TurnEvent::Completed { text } => return TurnOutcome::Completed(text),
                TurnEvent::Failed { error, fallback } => {
                    return TurnOutcome::Failed { error, fallback }
                }
            }
        }
        // `run` always ends with a terminal event.
        TurnOutcome::Failed {
            error: CompanionError::Stream("turn ended without a result".into()),
            fallback: FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Append `prompt` as the user message and run the turn.
    ///
    /// An empty prompt is rejected before anything is sent.
    pub async fn submit(
        &self,
        store: &mut SessionStore,
        prompt: impl Into<String>,
        on_update: impl FnMut(&str),
    ) -> Result<TurnOutcome> {
        store.append(Message::user(prompt))?;
        Ok(self.complete_turn(store, on_update).await)
    }
}
