// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by the external collaborators the
//! agent core depends on: embeddings, language model, social client.

pub mod embedding;
pub mod model;
pub mod social;

pub use embedding::EmbeddingProvider;
pub use model::LanguageModel;
pub use social::SocialClient;
