// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted session client for deterministic testing.
//!
//! `MockSessionClient` implements `SessionClient` against an in-memory
//! script: a fixed login code, a canned chat list, and a newest-first
//! message timeline that `fetch_history` pages through exactly like a real
//! backend would. Failure conditions (invalid phone, revoked session, flood
//! waits) are injected through the shared script handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use telearc_core::error::ClientError;
use telearc_core::traits::{SessionClient, SessionConnection};
use telearc_core::types::{
    ChatHandle, ChatKind, ChatSummary, LoginToken, RawMessage, ReplyRef, SenderInfo,
};

/// The scripted world a mock client operates against.
///
/// Tests mutate this through [`MockSessionClient::script`] before (or
/// between) driving the code under test.
#[derive(Debug)]
pub struct Script {
    /// The only login code `confirm_login` accepts.
    pub expected_code: String,
    /// The session secret issued on successful login and accepted by
    /// `reconnect`.
    pub issued_secret: String,
    /// When set, `reconnect` and `whoami` report the session as revoked.
    pub revoked: bool,
    /// When set, the account behind the credential is gone.
    pub deactivated: bool,
    pub chats: Vec<ChatSummary>,
    /// Full history per chat, newest first (descending message id).
    pub timelines: HashMap<i64, Vec<RawMessage>>,
    /// Flood waits keyed by 0-based `fetch_history` call index; each entry
    /// fires once.
    pub flood_waits: HashMap<usize, Duration>,
    pub senders: HashMap<i64, SenderInfo>,
    /// When set, every `resolve_sender` call fails.
    pub fail_sender_lookup: bool,
    /// When set, `fetch_history` panics, simulating a defective backend.
    pub panic_on_fetch: bool,
    /// `before_id` cursor of every `fetch_history` call, in order.
    pub fetch_log: Vec<i64>,
    fetch_calls: usize,
    issued_tokens: u32,
}

impl Default for Script {
    fn default() -> Self {
        Script {
            expected_code: "12345".to_string(),
            issued_secret: "mock-session-secret".to_string(),
            revoked: false,
            deactivated: false,
            chats: Vec::new(),
            timelines: HashMap::new(),
            flood_waits: HashMap::new(),
            senders: HashMap::new(),
            fail_sender_lookup: false,
            panic_on_fetch: false,
            fetch_log: Vec::new(),
            fetch_calls: 0,
            issued_tokens: 0,
        }
    }
}

/// A mock session client sharing one [`Script`].
#[derive(Clone, Default)]
pub struct MockSessionClient {
    script: Arc<Mutex<Script>>,
}

impl MockSessionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the script under the lock.
    pub fn script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = self.script.lock().unwrap();
        f(&mut guard)
    }

    /// Convenience: add a chat with `count` text messages, ids `1..=count`,
    /// newest first, one minute apart, all from `sender_id`.
    pub fn with_chat(self, chat_id: i64, title: &str, sender_id: i64, count: i64) -> Self {
        self.script(|s| {
            s.chats.push(ChatSummary {
                id: chat_id,
                title: title.to_string(),
                username: None,
                kind: ChatKind::Group,
            });
            let mut timeline = Vec::new();
            for id in (1..=count).rev() {
                timeline.push(text_message(id, sender_id, &format!("message {id}"), at(id)));
            }
            s.timelines.insert(chat_id, timeline);
        });
        self
    }

    /// Register a resolvable sender identity.
    pub fn with_sender(self, info: SenderInfo) -> Self {
        self.script(|s| {
            s.senders.insert(info.id, info.clone());
        });
        self
    }
}

#[async_trait]
impl SessionClient for MockSessionClient {
    async fn request_login_code(&self, phone: &str) -> Result<LoginToken, ClientError> {
        if !phone.starts_with('+') || phone.len() < 8 {
            return Err(ClientError::InvalidPhone(format!(
                "phone number rejected: {phone}"
            )));
        }
        self.script(|s| {
            s.issued_tokens += 1;
            Ok(LoginToken(format!("mock-token-{}", s.issued_tokens)))
        })
    }

    async fn confirm_login(
        &self,
        _phone: &str,
        code: &str,
        token: &LoginToken,
    ) -> Result<String, ClientError> {
        self.script(|s| {
            let current = format!("mock-token-{}", s.issued_tokens);
            if token.0 != current {
                return Err(ClientError::CodeRejected("stale login token".to_string()));
            }
            if code != s.expected_code {
                return Err(ClientError::CodeRejected("wrong code".to_string()));
            }
            Ok(s.issued_secret.clone())
        })
    }

    async fn reconnect(
        &self,
        session_secret: &str,
    ) -> Result<Arc<dyn SessionConnection>, ClientError> {
        self.script(|s| {
            if s.deactivated {
                return Err(ClientError::AccountDeactivated);
            }
            if s.revoked || session_secret != s.issued_secret {
                return Err(ClientError::SessionRejected);
            }
            Ok(())
        })?;
        Ok(Arc::new(MockSessionConnection {
            script: self.script.clone(),
        }))
    }
}

/// Live connection over the same script.
pub struct MockSessionConnection {
    script: Arc<Mutex<Script>>,
}

impl MockSessionConnection {
    fn script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = self.script.lock().unwrap();
        f(&mut guard)
    }
}

#[async_trait]
impl SessionConnection for MockSessionConnection {
    async fn whoami(&self) -> Result<(), ClientError> {
        self.script(|s| {
            if s.deactivated {
                Err(ClientError::AccountDeactivated)
            } else if s.revoked {
                Err(ClientError::SessionRejected)
            } else {
                Ok(())
            }
        })
    }

    async fn list_chats(&self, limit: usize) -> Result<Vec<ChatSummary>, ClientError> {
        self.script(|s| {
            if s.revoked {
                return Err(ClientError::SessionRejected);
            }
            Ok(s.chats.iter().take(limit).cloned().collect())
        })
    }

    async fn resolve_chat(&self, chat_id: i64) -> Result<ChatHandle, ClientError> {
        self.script(|s| {
            if s.revoked {
                return Err(ClientError::SessionRejected);
            }
            if s.chats.iter().any(|c| c.id == chat_id) {
                Ok(ChatHandle {
                    id: chat_id,
                    access_hash: Some(chat_id * 1000 + 7),
                })
            } else {
                Err(ClientError::Transport(format!("no such chat: {chat_id}")))
            }
        })
    }

    async fn fetch_history(
        &self,
        chat: &ChatHandle,
        before_id: i64,
        batch_size: usize,
    ) -> Result<Vec<RawMessage>, ClientError> {
        self.script(|s| {
            let call = s.fetch_calls;
            s.fetch_calls += 1;
            s.fetch_log.push(before_id);

            if s.panic_on_fetch {
                panic!("scripted backend fault");
            }
            if let Some(wait) = s.flood_waits.remove(&call) {
                return Err(ClientError::RateLimited { wait });
            }
            if s.revoked {
                return Err(ClientError::SessionRejected);
            }

            let timeline = s.timelines.get(&chat.id).cloned().unwrap_or_default();
            let page = timeline
                .into_iter()
                .filter(|m| before_id == 0 || m.id < before_id)
                .take(batch_size)
                .collect();
            Ok(page)
        })
    }

    async fn resolve_sender(&self, sender_id: i64) -> Result<SenderInfo, ClientError> {
        self.script(|s| {
            if s.fail_sender_lookup {
                return Err(ClientError::Transport("sender lookup failed".to_string()));
            }
            s.senders
                .get(&sender_id)
                .cloned()
                .ok_or_else(|| ClientError::Transport(format!("unknown sender: {sender_id}")))
        })
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

/// Deterministic timestamp for message `id`: one minute per id, base
/// 2026-01-01T00:00:00Z.
pub fn at(id: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(id)
}

/// Build a plain text message.
pub fn text_message(id: i64, sender_id: i64, text: &str, date: DateTime<Utc>) -> RawMessage {
    RawMessage {
        id,
        sender_id: Some(sender_id),
        text: Some(text.to_string()),
        date,
        reply: None,
        entities: None,
        raw: serde_json::json!({ "id": id, "message": text }),
    }
}

/// Build a message with no text payload (service message, bare media).
pub fn service_message(id: i64, date: DateTime<Utc>) -> RawMessage {
    RawMessage {
        id,
        sender_id: None,
        text: None,
        date,
        reply: None,
        entities: None,
        raw: serde_json::json!({ "id": id, "action": "chat_photo_changed" }),
    }
}

/// Build a text message replying to `reply_to`.
pub fn reply_message(
    id: i64,
    sender_id: i64,
    text: &str,
    date: DateTime<Utc>,
    reply_to: i64,
) -> RawMessage {
    RawMessage {
        id,
        sender_id: Some(sender_id),
        text: Some(text.to_string()),
        date,
        reply: Some(ReplyRef {
            message_id: Some(reply_to),
        }),
        entities: None,
        raw: serde_json::json!({ "id": id, "message": text, "reply_to": reply_to }),
    }
}
