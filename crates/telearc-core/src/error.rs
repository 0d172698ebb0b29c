// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Telearc archiver.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Telearc crates and core operations.
///
/// Display messages are category-level by design: they are what an outer
/// layer may show to a caller, so they never embed raw platform exception
/// text. Full context goes to the tracing logs at the failure site.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, serialization).
    /// The only retryable category.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The platform rejected the phone number format.
    #[error("invalid phone number")]
    InvalidPhone(String),

    /// `confirm_code` was called with no outstanding login request.
    #[error("no pending login request")]
    NoPendingRequest,

    /// Sign-in failed (expired code, wrong code, network fault during confirm).
    #[error("code confirmation failed")]
    CodeConfirmation(String),

    /// No stored session secret exists, or it could not be resolved.
    #[error("no valid session")]
    NoValidSession,

    /// The platform no longer accepts the stored credential.
    #[error("session rejected by platform")]
    SessionRejected,

    /// An ingestion job is already running (single-flight conflict).
    #[error("an ingestion job is already running")]
    AlreadyRunning,

    /// Ciphertext was tampered, malformed, or sealed under a different key.
    /// Callers must treat this as "session unusable", not as transient.
    #[error("decryption failed")]
    Decryption(String),

    /// Internal or unexpected errors. Logged with full context, surfaced
    /// generically.
    #[error("internal error")]
    Internal(String),
}

impl ArchiveError {
    /// Build a storage error from any boxable source.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ArchiveError::Storage {
            source: source.into(),
        }
    }

    /// Whether a bounded retry is worthwhile. Only storage-layer failures
    /// qualify; everything else is either terminal or a state-machine outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ArchiveError::Storage { .. })
    }
}

/// Conditions raised at the external platform boundary.
///
/// The session client collaborator reports these distinguished conditions;
/// the auth machine and ingestion engine decide what each means for the
/// stored credential and the running job.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The platform rejected the phone number format.
    #[error("platform rejected phone number: {0}")]
    InvalidPhone(String),

    /// The platform rejected the login code (wrong or expired).
    #[error("platform rejected login code: {0}")]
    CodeRejected(String),

    /// Flood control: the platform demands a wait before the same request
    /// may be retried. Honored exactly, no jitter, no cap.
    #[error("rate limited for {wait:?}")]
    RateLimited { wait: Duration },

    /// The session secret is no longer accepted (revoked / unregistered key).
    #[error("session rejected")]
    SessionRejected,

    /// The account behind the credential was deactivated.
    #[error("account deactivated")]
    AccountDeactivated,

    /// Connectivity or protocol-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// True for conditions that mean the stored credential is dead and the
    /// auth machine must transition to invalid, regardless of which
    /// operation observed the error.
    pub fn invalidates_credential(&self) -> bool {
        matches!(
            self,
            ClientError::SessionRejected | ClientError::AccountDeactivated
        )
    }
}
