// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Social publishing capability trait.

use async_trait::async_trait;

use crate::error::CorvidError;

/// The three platform operations the agent core depends on.
///
/// Everything else about the platform's API semantics is out of scope;
/// failures surface as [`CorvidError::Publish`].
#[async_trait]
pub trait SocialClient: Send + Sync {
    /// Publishes a public post.
    async fn post(&self, text: &str) -> Result<(), CorvidError>;

    /// Resolves a handle to an opaque recipient id.
    ///
    /// Returns `Ok(None)` when the handle does not exist; that is a
    /// routing decision for the caller, not an error.
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, CorvidError>;

    /// Sends a direct message to a previously resolved recipient id.
    async fn send_direct_message(&self, recipient_id: &str, text: &str)
    -> Result<(), CorvidError>;
}
