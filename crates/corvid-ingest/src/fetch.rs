// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP document fetcher for knowledge ingestion.

use std::time::Duration;

use corvid_core::{CorvidError, Document};
use tracing::{debug, info};

use crate::text::strip_html;

/// Fetches source documents over HTTP and extracts their text.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
}

impl DocumentFetcher {
    /// Creates a fetcher with a 30-second per-request timeout.
    pub fn new() -> Result<Self, CorvidError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("corvid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CorvidError::Fetch {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    /// Fetches every URL, returning one document per URL in input order.
    ///
    /// Ingestion is an explicit, observable path: any failed URL fails
    /// the whole fetch with [`CorvidError::Fetch`].
    pub async fn fetch_documents(&self, urls: &[String]) -> Result<Vec<Document>, CorvidError> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            let document = self.fetch_one(url).await?;
            documents.push(document);
        }
        info!(count = documents.len(), "documents fetched");
        Ok(documents)
    }

    async fn fetch_one(&self, url: &str) -> Result<Document, CorvidError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CorvidError::Fetch {
                message: format!("request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CorvidError::Fetch {
                message: format!("{url} returned {status}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| CorvidError::Fetch {
            message: format!("failed to read body from {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let text = strip_html(&body);
        debug!(url, chars = text.len(), "document extracted");
        Ok(Document {
            text,
            source: url.to_string(),
        })
    }
}
