// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Telearc crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Placeholder sender name when identity resolution fails or the message
/// carries no sender.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Lifecycle of the single stored credential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    /// No credential stored.
    Empty,
    /// A login code was requested; a login token is outstanding.
    Pending,
    /// A session secret is stored and was last validated successfully.
    Valid,
    /// The stored credential was rejected or sign-in failed.
    Invalid,
}

/// State of the single process-wide ingestion job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Result of an auth status probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProbe {
    pub status: AuthStatus,
    pub phone: Option<String>,
}

/// Read-only snapshot of the ingestion job state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestProgress {
    pub status: IngestStatus,
    /// Capped estimate in [0, 1]; monotonically non-decreasing while running.
    pub fraction_complete: f64,
    /// Includes pre-existing archived rows for the target chat.
    pub messages_processed: u64,
    /// Chat description while running, error category text after a failure.
    pub target_chat_label: Option<String>,
}

/// Short-lived value issued when a login code is requested; required to
/// complete sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginToken(pub String);

/// Kind of platform peer a chat belongs to, resolved once at the
/// collaborator boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    User,
    Group,
    Channel,
}

/// A chat as listed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: i64,
    pub title: String,
    pub username: Option<String>,
    pub kind: ChatKind,
}

/// Resolved handle to a chat, as needed by history pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatHandle {
    pub id: i64,
    /// Platform access token for the peer, when the platform issues one.
    pub access_hash: Option<i64>,
}

/// Reply marker on a raw message.
///
/// Present only when the platform marks the message as a reply; the
/// referenced id may still be absent when the platform omits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRef {
    pub message_id: Option<i64>,
}

/// A message as fetched from the platform, prior to filtering.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub id: i64,
    pub sender_id: Option<i64>,
    /// Absent for service messages, media without caption, and other
    /// non-text records.
    pub text: Option<String>,
    pub date: DateTime<Utc>,
    pub reply: Option<ReplyRef>,
    /// Structured formatting entities, when present.
    pub entities: Option<serde_json::Value>,
    /// Full original payload, kept opaque for forward compatibility.
    pub raw: serde_json::Value,
}

/// A platform user as resolved for sender attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderInfo {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl SenderInfo {
    /// Best-effort display name: "first last", falling back to the username,
    /// then to [`UNKNOWN_SENDER`].
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        self.username
            .clone()
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn auth_status_round_trips_through_strings() {
        for status in [
            AuthStatus::Empty,
            AuthStatus::Pending,
            AuthStatus::Valid,
            AuthStatus::Invalid,
        ] {
            let s = status.to_string();
            assert_eq!(AuthStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(AuthStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn ingest_status_serializes_lowercase() {
        let json = serde_json::to_string(&IngestStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }

    #[test]
    fn display_name_prefers_full_name() {
        let sender = SenderInfo {
            id: 7,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            username: Some("ada".into()),
        };
        assert_eq!(sender.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let sender = SenderInfo {
            id: 7,
            username: Some("ada".into()),
            ..Default::default()
        };
        assert_eq!(sender.display_name(), "ada");
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let sender = SenderInfo {
            id: 7,
            ..Default::default()
        };
        assert_eq!(sender.display_name(), UNKNOWN_SENDER);
    }

    #[test]
    fn display_name_handles_partial_names() {
        let sender = SenderInfo {
            id: 7,
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        assert_eq!(sender.display_name(), "Ada");
    }

    #[test]
    fn reply_ref_id_may_be_absent() {
        // The platform can mark a message as a reply without providing the
        // referenced id.
        let reply = ReplyRef { message_id: None };
        assert!(reply.message_id.is_none());
    }
}
