//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CompanionError, Result};
use crate::types::{FinishReason, Fragment, Message};

use super::http::{bearer_headers, parse_sse_line, shared_client, status_to_error, SseLine};
use super::{Completion, CompletionRequest, CompletionService};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { api_key, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post(&self, request: &CompletionRequest, stream: bool) -> Result<reqwest::Response> {
        let body = ChatCompletionBody::new(request, stream);
        let resp = shared_client()
            .post(self.endpoint())
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }
        Ok(resp)
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionService for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        debug!(model = request.model.as_str(), "OpenAI complete");

        let resp = self.post(request, false).await?;
        let data: OpenAiChatResponse = serde_json::from_slice(&resp.bytes().await?)?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompanionError::api(200, "No choices in OpenAI response"))?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::from_wire),
        })
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<Fragment>>> {
        debug!(model = request.model.as_str(), "OpenAI stream");

        let resp = self.post(request, true).await?;
        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(CompanionError::Network(e));
                        return;
                    }
                };
                buffer.extend_from_slice(&chunk);

                // Split on raw bytes so multi-byte characters cut across
                // chunks are decoded whole.
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line_bytes: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line_bytes).trim().to_string();

                    match parse_sse_line(&line) {
                        None => continue,
                        Some(SseLine::Done) => return,
                        Some(SseLine::Data(data)) => match decode_stream_chunk(data) {
                            Ok(Some(fragment)) => {
                                yield Ok(fragment);
                            }
                            Ok(None) => {}
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        },
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Decode one `data:` payload. `Ok(None)` for chunks without choices.
fn decode_stream_chunk(data: &str) -> Result<Option<Fragment>> {
    let chunk: OpenAiStreamChunk = serde_json::from_str(data)?;
    if let Some(err) = chunk.error {
        return Err(CompanionError::Stream(err.message));
    }
    Ok(chunk.choices.into_iter().next().map(|choice| Fragment {
        delta: choice.delta.content,
        finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::from_wire),
    }))
}

// OpenAI API request/response types (internal)

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'static str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

impl<'a> ChatCompletionBody<'a> {
    /// Reasoning models take `max_completion_tokens` and no sampling
    /// parameters; the others take `max_tokens` and `temperature`.
    fn new(request: &'a CompletionRequest, stream: bool) -> Self {
        let reasoning = request.model.is_reasoning();
        Self {
            model: request.model.as_str(),
            messages: &request.messages,
            stream,
            temperature: (!reasoning).then_some(request.temperature),
            max_tokens: (!reasoning).then_some(request.max_tokens),
            max_completion_tokens: reasoning.then_some(request.max_tokens),
        }
    }
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
    error: Option<OpenAiErrorBody>,
}

#[derive(Deserialize)]
struct OpenAiStreamChoice {
    #[serde(default)]
    delta: OpenAiStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct OpenAiStreamDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    message: String,
}
