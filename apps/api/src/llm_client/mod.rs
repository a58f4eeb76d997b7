//! LLM Client — the single point of entry for all chat-completion calls in Faísca.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! Callers go through the `CompletionBackend` trait carried in `AppState`.
//!
//! Model: mixtral-8x7b-32768 (hardcoded — do not make configurable to prevent drift)

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod sse;

use sse::{SseDecoder, DONE_MARKER};

/// The model used for all completion calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "mixtral-8x7b-32768";
pub const TEMPERATURE: f32 = 0.5;
pub const MAX_TOKENS: u32 = 5640;
pub const TOP_P: f32 = 1.0;

const CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),
}

/// Ordered, finite, non-restartable sequence of completion fragments.
pub type FragmentStream = BoxStream<'static, Result<String, LlmError>>;

/// A fully-specified chat completion: one system message, one user message,
/// fixed sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_message: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

/// The completion backend trait. Implement this to swap transports without
/// touching handlers or the aggregator.
///
/// Carried in `AppState` as `Arc<dyn CompletionBackend>`.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Starts a streaming completion. Errors before the first fragment (connection,
    /// authentication, rate limit) are returned here; later ones arrive in the stream.
    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<&'a str>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> From<&'a CompletionRequest> for ChatRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            stream: request.stream,
            stop: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

enum StreamEvent {
    Fragment(String),
    Done,
}

/// Interprets one SSE data payload from the completion stream.
fn parse_stream_payload(payload: &str) -> Result<StreamEvent, LlmError> {
    if payload.trim() == DONE_MARKER {
        return Ok(StreamEvent::Done);
    }

    let chunk: ChunkPayload = serde_json::from_str(payload)?;
    if let Some(error) = chunk.error {
        return Err(LlmError::Stream(error.message));
    }

    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default();

    Ok(StreamEvent::Fragment(text))
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// The production completion backend: an OpenAI-compatible endpoint (Groq by default)
/// authenticated with a bearer key.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, LlmError> {
        // No overall timeout: a long plan streams for as long as the model writes.
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, LlmError> {
        let body = ChatRequest::from(request);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, body);
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Completion stream opened (model: {MODEL})");
        Ok(fragment_stream(response.bytes_stream()))
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

struct DecodeState {
    bytes: ByteStream,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, LlmError>>,
    finished: bool,
}

impl DecodeState {
    /// Queues the payloads of newly completed events. Returns true once the stream is over.
    fn enqueue(&mut self, payloads: impl IntoIterator<Item = String>) -> bool {
        for payload in payloads {
            match parse_stream_payload(&payload) {
                Ok(StreamEvent::Fragment(text)) => self.pending.push_back(Ok(text)),
                Ok(StreamEvent::Done) => return true,
                Err(e) => {
                    self.pending.push_back(Err(e));
                    return true;
                }
            }
        }
        false
    }
}

/// Turns an SSE byte body into fragments. Stops after `[DONE]` or the first error.
fn fragment_stream<S>(bytes: S) -> FragmentStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let payloads = state.decoder.push(&chunk);
                    state.finished = state.enqueue(payloads);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(LlmError::Http(e)), state));
                }
                None => {
                    let trailing = state.decoder.finish();
                    state.enqueue(trailing);
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}
