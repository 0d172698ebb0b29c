// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Telearc archiver.
//!
//! Provides the error taxonomy, domain types, and the collaborator traits
//! used throughout the Telearc workspace. The external session client is
//! modeled here as a capability contract only.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ArchiveError, ClientError};
pub use traits::{SessionClient, SessionConnection};
pub use types::{
    AuthProbe, AuthStatus, ChatHandle, ChatKind, ChatSummary, IngestProgress, IngestStatus,
    LoginToken, RawMessage, ReplyRef, SenderInfo,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_is_complete() {
        // All caller-visible categories exist and can be constructed.
        let _config = ArchiveError::Config("test".into());
        let _storage = ArchiveError::storage("test");
        let _phone = ArchiveError::InvalidPhone("test".into());
        let _pending = ArchiveError::NoPendingRequest;
        let _code = ArchiveError::CodeConfirmation("test".into());
        let _session = ArchiveError::NoValidSession;
        let _rejected = ArchiveError::SessionRejected;
        let _running = ArchiveError::AlreadyRunning;
        let _decrypt = ArchiveError::Decryption("test".into());
        let _internal = ArchiveError::Internal("test".into());
    }

    #[test]
    fn traits_are_object_safe() {
        // The collaborator traits must be usable behind Arc<dyn ...>.
        fn _client(_: std::sync::Arc<dyn SessionClient>) {}
        fn _conn(_: std::sync::Arc<dyn SessionConnection>) {}
    }
}
