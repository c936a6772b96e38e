// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Corvid integration tests.
//!
//! Provides mock implementations of the core capability traits for
//! fast, deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockLanguageModel`] - scripted chat completions with a failure toggle
//! - [`MockEmbeddingProvider`] - deterministic embedding vectors
//! - [`MockSocialClient`] - captures posts and direct messages for assertion

pub mod mock_embedder;
pub mod mock_model;
pub mod mock_social;

pub use mock_embedder::MockEmbeddingProvider;
pub use mock_model::MockLanguageModel;
pub use mock_social::MockSocialClient;
