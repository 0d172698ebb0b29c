// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the archive database.
//!
//! Timestamps are stored as RFC 3339 strings with millisecond precision
//! (`2026-01-01T00:00:00.000Z`), which sorts correctly as text.

/// The singleton credential row (id = 1).
///
/// `status` holds the auth lifecycle string (`empty` / `pending` / `valid` /
/// `invalid`); parsing into the typed enum happens at the auth layer.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub phone: Option<String>,
    /// Base64 AES-256-GCM envelope produced by the vault. Never cleartext.
    pub encrypted_secret: Option<String>,
    pub pending_login_token: Option<String>,
    pub status: String,
    pub updated_at: String,
}

/// One archived message, keyed by `(chat_id, msg_id)`.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub chat_id: i64,
    pub msg_id: i64,
    pub sender_id: Option<i64>,
    pub sender_name: String,
    pub text: String,
    /// RFC 3339 UTC timestamp of the original message.
    pub date: String,
    pub is_reply: bool,
    pub reply_to_msg_id: Option<i64>,
    /// Formatting entities as a JSON array, when the platform supplied any.
    pub entities: Option<String>,
    /// Complete platform payload as JSON, for fields the columns don't model.
    pub raw_json: String,
}
