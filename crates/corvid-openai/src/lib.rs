// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible provider for the Corvid agent.
//!
//! One HTTP client serves both capability traits: chat completions
//! for [`corvid_core::LanguageModel`] and the embeddings endpoint for
//! [`corvid_core::EmbeddingProvider`].

pub mod client;
pub mod types;

pub use client::OpenAiClient;
