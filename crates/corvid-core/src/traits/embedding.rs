// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding capability trait.

use async_trait::async_trait;

use crate::error::CorvidError;

/// Maps text to fixed-length numeric vectors.
///
/// Implementations must return one vector per input text, in input
/// order, and be deterministic for deterministic input.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generates embeddings for the given texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CorvidError>;
}
