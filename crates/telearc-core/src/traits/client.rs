// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability contract for the external session client.
//!
//! The third-party messaging protocol is an external collaborator: these
//! traits define the behavior the core depends on, with no wire format
//! mandated. Concrete backends live outside the core; tests use the
//! scripted mock in `telearc-test-utils`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{ChatHandle, ChatSummary, LoginToken, RawMessage, SenderInfo};

/// Entry points that do not require an authenticated connection.
#[async_trait]
pub trait SessionClient: Send + Sync + 'static {
    /// Ask the platform to send a verification code to `phone`.
    ///
    /// Returns the login token that must accompany the subsequent
    /// [`confirm_login`](Self::confirm_login) call.
    async fn request_login_code(&self, phone: &str) -> Result<LoginToken, ClientError>;

    /// Complete sign-in with the user-supplied code.
    ///
    /// On success the platform issues a reusable session secret.
    async fn confirm_login(
        &self,
        phone: &str,
        code: &str,
        token: &LoginToken,
    ) -> Result<String, ClientError>;

    /// Establish a live connection from a previously issued session secret.
    ///
    /// Fails with [`ClientError::SessionRejected`] when the secret is no
    /// longer accepted.
    async fn reconnect(
        &self,
        session_secret: &str,
    ) -> Result<Arc<dyn SessionConnection>, ClientError>;
}

/// Operations available on a live, authenticated connection.
#[async_trait]
pub trait SessionConnection: Send + Sync + 'static {
    /// Confirm the session secret is still accepted by the platform.
    async fn whoami(&self) -> Result<(), ClientError>;

    /// List the user's chats, newest activity first, up to `limit`.
    async fn list_chats(&self, limit: usize) -> Result<Vec<ChatSummary>, ClientError>;

    /// Resolve a chat id to a handle usable for history pagination.
    async fn resolve_chat(&self, chat_id: i64) -> Result<ChatHandle, ClientError>;

    /// Fetch one page of history, newest first, strictly older than
    /// `before_id` (`0` means "from the newest message").
    ///
    /// May fail with [`ClientError::RateLimited`], in which case the caller
    /// must wait the signaled duration and re-fetch the same page.
    async fn fetch_history(
        &self,
        chat: &ChatHandle,
        before_id: i64,
        batch_size: usize,
    ) -> Result<Vec<RawMessage>, ClientError>;

    /// Resolve a sender id to identity details. Best-effort for callers:
    /// a failure here must not fail the message being processed.
    async fn resolve_sender(&self, sender_id: i64) -> Result<SenderInfo, ClientError>;

    /// Tear down the live connection.
    async fn disconnect(&self) -> Result<(), ClientError>;
}

impl std::fmt::Debug for dyn SessionConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn SessionConnection")
    }
}
