// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! X API v2 client for the Corvid agent.
//!
//! Implements [`SocialClient`] with the three operations the agent
//! core depends on: publish a post, resolve a handle to a user id,
//! and send a direct message. Anything else about the platform API
//! is out of scope.

use std::time::Duration;

use async_trait::async_trait;
use corvid_core::{CorvidError, SocialClient};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info};

/// Base URL for the X API.
const API_BASE_URL: &str = "https://api.x.com";

#[derive(Debug, Deserialize)]
struct UserLookupResponse {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
}

/// HTTP client for X API v2 publishing.
#[derive(Debug, Clone)]
pub struct XClient {
    client: reqwest::Client,
    base_url: String,
}

impl XClient {
    /// Creates a new client authenticated with a bearer token.
    pub fn new(bearer_token: &str) -> Result<Self, CorvidError> {
        Self::with_base_url(bearer_token, API_BASE_URL)
    }

    /// Creates a client against a specific API root (the test seam).
    pub fn with_base_url(
        bearer_token: &str,
        base_url: impl Into<String>,
    ) -> Result<Self, CorvidError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {bearer_token}");
        let mut auth = HeaderValue::from_str(&bearer)
            .map_err(|e| CorvidError::Config(format!("invalid bearer token header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CorvidError::Publish {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
        what: &str,
    ) -> Result<(), CorvidError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CorvidError::Publish {
                message: format!("{what} request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, what, "publish request accepted");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CorvidError::Publish {
                message: format!("{what} returned {status}: {body}"),
                source: None,
            })
        }
    }
}

#[async_trait]
impl SocialClient for XClient {
    async fn post(&self, text: &str) -> Result<(), CorvidError> {
        let url = format!("{}/2/tweets", self.base_url);
        self.post_json(&url, serde_json::json!({ "text": text }), "post")
            .await?;
        info!(chars = text.len(), "post published");
        Ok(())
    }

    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, CorvidError> {
        let handle = handle.trim_start_matches('@');
        let url = format!("{}/2/users/by/username/{handle}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CorvidError::Publish {
                message: format!("handle lookup failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        // An unknown handle is a routing outcome, not a failure.
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(handle, "handle not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CorvidError::Publish {
                message: format!("handle lookup returned {status}: {body}"),
                source: None,
            });
        }

        let lookup: UserLookupResponse =
            response.json().await.map_err(|e| CorvidError::Publish {
                message: format!("failed to parse handle lookup response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(lookup.data.map(|d| d.id))
    }

    async fn send_direct_message(
        &self,
        recipient_id: &str,
        text: &str,
    ) -> Result<(), CorvidError> {
        let url = format!(
            "{}/2/dm_conversations/with/{recipient_id}/messages",
            self.base_url
        );
        self.post_json(&url, serde_json::json!({ "text": text }), "direct message")
            .await?;
        info!(recipient_id, "direct message sent");
        Ok(())
    }
}
