// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Corvid agent.
//!
//! This crate provides the capability trait definitions, error types,
//! and common types used throughout the Corvid workspace. The agent
//! core talks to its external collaborators (embedding provider,
//! language model, social client) only through the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CorvidError;
pub use traits::{EmbeddingProvider, LanguageModel, SocialClient};
pub use types::{ChatMessage, Document, ModelRequest, Role};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies the three capability traits compile and are
        // accessible through the public API.
        fn _assert_embedding<T: EmbeddingProvider>() {}
        fn _assert_model<T: LanguageModel>() {}
        fn _assert_social<T: SocialClient>() {}
    }
}
