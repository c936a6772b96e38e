// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language model capability trait.

use async_trait::async_trait;

use crate::error::CorvidError;
use crate::types::ModelRequest;

/// A chat-completion language model.
///
/// Given an ordered message sequence, returns the assistant's reply
/// text or fails with [`CorvidError::Model`]. The agent core supplies
/// a fallback string on failure; implementations should not.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends a completion request and returns the generated text.
    async fn complete(&self, request: ModelRequest) -> Result<String, CorvidError>;
}
