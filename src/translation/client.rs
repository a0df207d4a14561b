use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::Stream;
use reqwest::Client;
use serde::Serialize;
use std::borrow::Cow;
use std::pin::Pin;

use super::sse;
use crate::config::TranslationConfig;

/// One prepared completion request: the prompt pair plus the model to run.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub source_text: String,
}

/// An in-order stream of text deltas from the remote service.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// The remote completion service, reduced to "send a prompt, stream deltas".
///
/// The session core only depends on this trait; the HTTP wire format lives
/// entirely in [`TranslationClient`]. Tests substitute scripted
/// implementations to drive the session state machine without a network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Opens a streaming completion. Endpoint and credential come from the
    /// per-request config snapshot, so one backend serves any number of
    /// sessions.
    async fn stream_completion(
        &self,
        config: &TranslationConfig,
        request: CompletionRequest,
    ) -> Result<DeltaStream>;
}

// Cow avoids cloning the source text just to serialize the request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

/// HTTP client for OpenAI-compatible chat-completion endpoints.
#[derive(Default)]
pub struct TranslationClient {
    client: Client,
}

impl TranslationClient {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The configured endpoint already ends in the API root (e.g. `.../v1`);
/// only the resource path is appended.
fn completions_url(endpoint: &str) -> String {
    format!("{}/chat/completions", endpoint.trim_end_matches('/'))
}

#[async_trait]
impl CompletionBackend for TranslationClient {
    async fn stream_completion(
        &self,
        config: &TranslationConfig,
        request: CompletionRequest,
    ) -> Result<DeltaStream> {
        let url = completions_url(&config.api_endpoint);

        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(&request.system_prompt),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(&request.source_text),
                },
            ],
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", config.api_key))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to API endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {status}: {body}");
        }

        Ok(Box::pin(sse::delta_stream(response.bytes_stream())))
    }
}
