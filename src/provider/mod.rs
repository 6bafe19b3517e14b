//! Completion service trait and implementations.

pub mod http;
pub mod openai;

use async_trait::async_trait;
use bon::Builder;
use futures::stream::BoxStream;

use crate::config::CompanionConfig;
use crate::error::{CompanionError, Result};
use crate::models::ChatModel;
use crate::types::{FinishReason, Fragment, Message};

/// A request sent to a completion service.
///
/// `messages` already includes the leading system message.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct CompletionRequest {
    pub model: ChatModel,
    pub messages: Vec<Message>,
    pub stream: bool,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A complete, non-streamed response.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

/// The external text-completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// Return the whole response as one block.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;

    /// Return a lazy, finite stream of fragments.
    ///
    /// Errors before the first fragment come back as `Err`; failures after
    /// that are yielded as an `Err` item and end the stream.
    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<Fragment>>>;
}

/// Create the default completion service from `config`.
///
/// Fails with [`CompanionError::Authentication`] when no API key is present.
pub fn create_service(config: &CompanionConfig) -> Result<Box<dyn CompletionService>> {
    let api_key = config.require_api_key()?;
    if api_key.trim().is_empty() {
        return Err(CompanionError::Authentication(
            "OPENAI_API_KEY is empty".into(),
        ));
    }
    Ok(Box::new(openai::OpenAiProvider::new(
        api_key,
        config.base_url(),
    )))
}
