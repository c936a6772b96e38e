// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock social client that captures outbound traffic for assertion.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use corvid_core::{CorvidError, SocialClient};

/// A mock publishing client for testing.
///
/// Captures posts and direct messages in order, resolves handles from
/// a pre-registered map, and can be flipped into failure mode to
/// exercise publish error paths.
pub struct MockSocialClient {
    posts: Arc<Mutex<Vec<String>>>,
    direct_messages: Arc<Mutex<Vec<(String, String)>>>,
    handles: Arc<Mutex<HashMap<String, String>>>,
    fail: Arc<AtomicBool>,
}

impl MockSocialClient {
    /// Create a new mock client with no registered handles.
    pub fn new() -> Self {
        Self {
            posts: Arc::new(Mutex::new(Vec::new())),
            direct_messages: Arc::new(Mutex::new(Vec::new())),
            handles: Arc::new(Mutex::new(HashMap::new())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a handle so `resolve_handle` returns the given id.
    pub async fn register_handle(&self, handle: &str, id: &str) {
        self.handles
            .lock()
            .await
            .insert(handle.to_string(), id.to_string());
    }

    /// Toggle failure mode: when set, `post` and `send_direct_message`
    /// return a `Publish` error.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Get all published posts, in publish order.
    pub async fn posts(&self) -> Vec<String> {
        self.posts.lock().await.clone()
    }

    /// Get all sent direct messages as `(recipient_id, text)` pairs.
    pub async fn direct_messages(&self) -> Vec<(String, String)> {
        self.direct_messages.lock().await.clone()
    }

    fn publish_error(&self) -> CorvidError {
        CorvidError::Publish {
            message: "mock publish failure".to_string(),
            source: None,
        }
    }
}

impl Default for MockSocialClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialClient for MockSocialClient {
    async fn post(&self, text: &str) -> Result<(), CorvidError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(self.publish_error());
        }
        self.posts.lock().await.push(text.to_string());
        Ok(())
    }

    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, CorvidError> {
        let handle = handle.trim_start_matches('@');
        Ok(self.handles.lock().await.get(handle).cloned())
    }

    async fn send_direct_message(
        &self,
        recipient_id: &str,
        text: &str,
    ) -> Result<(), CorvidError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(self.publish_error());
        }
        self.direct_messages
            .lock()
            .await
            .push((recipient_id.to_string(), text.to_string()));
        Ok(())
    }
}
