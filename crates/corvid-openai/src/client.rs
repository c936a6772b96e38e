// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completion and embedding
//! endpoints.
//!
//! Handles request construction, bearer authentication, and transient
//! error retry. Implements the [`LanguageModel`] and
//! [`EmbeddingProvider`] capability traits.

use std::time::Duration;

use async_trait::async_trait;
use corvid_core::{CorvidError, EmbeddingProvider, LanguageModel, ModelRequest};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest,
    EmbeddingResponse, WireMessage,
};

/// HTTP client for an OpenAI-compatible API.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a new API client.
    ///
    /// `base_url` is the API root (e.g. `https://api.openai.com/v1`);
    /// pointing it at a local mock server is the test seam.
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        chat_model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Result<Self, CorvidError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        let mut auth = HeaderValue::from_str(&bearer)
            .map_err(|e| CorvidError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CorvidError::Model {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_model: chat_model.into(),
            embedding_model: embedding_model.into(),
            max_retries: 1,
        })
    }

    /// Chat model identifier requests are sent with.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Sends a chat completion request and returns the assistant text.
    ///
    /// On transient errors (429, 500, 503), retries once after a
    /// 1-second delay.
    async fn complete_chat(&self, request: &ChatCompletionRequest) -> Result<String, CorvidError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self
            .send_with_retry(&url, request, |message, source| CorvidError::Model {
                message,
                source,
            })
            .await?;

        let response: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| CorvidError::Model {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| CorvidError::Model {
                message: "API response contained no choices".into(),
                source: None,
            })?;
        Ok(text)
    }

    /// Sends an embedding request, preserving input order.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CorvidError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: texts.to_vec(),
        };
        let body = self
            .send_with_retry(&url, &request, |message, source| CorvidError::Embedding {
                message,
                source,
            })
            .await?;

        let response: EmbeddingResponse =
            serde_json::from_str(&body).map_err(|e| CorvidError::Embedding {
                message: format!("failed to parse embeddings response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if response.data.len() != texts.len() {
            return Err(CorvidError::Embedding {
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    response.data.len()
                ),
                source: None,
            });
        }

        // The API tags rows with their input index; sort to guarantee
        // input-order correspondence.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    /// POSTs `request` as JSON, retrying once on transient status.
    ///
    /// `make_err` shapes failures into the caller's error variant.
    async fn send_with_retry<T, F>(
        &self,
        url: &str,
        request: &T,
        make_err: F,
    ) -> Result<String, CorvidError>
    where
        T: serde::Serialize,
        F: Fn(String, Option<Box<dyn std::error::Error + Send + Sync>>) -> CorvidError,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| make_err(format!("HTTP request failed: {e}"), Some(Box::new(e))))?;

            let status = response.status();
            debug!(status = %status, attempt, "response received");

            if status.is_success() {
                return response
                    .text()
                    .await
                    .map_err(|e| make_err(format!("failed to read response body: {e}"), Some(Box::new(e))));
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(make_err(format!("API returned {status}: {body}"), None));
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(make_err(message, None));
        }

        Err(last_error
            .unwrap_or_else(|| make_err("request failed after retries".into(), None)))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: ModelRequest) -> Result<String, CorvidError> {
        let wire = ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
            stop: request.stop.clone(),
        };
        self.complete_chat(&wire).await
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CorvidError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_texts(texts).await
    }
}
