// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telearc - a single-user chat archiver.
//!
//! Re-exports the assembled [`ArchiveService`] along with the pieces needed
//! to embed the archiver: configuration, core types and errors, and the
//! session-client contract a backend must implement.

pub mod service;

pub use service::ArchiveService;
pub use telearc_config::TelearcConfig;
pub use telearc_core::error::{ArchiveError, ClientError};
pub use telearc_core::traits::{SessionClient, SessionConnection};
pub use telearc_core::types::{AuthProbe, AuthStatus, ChatSummary, IngestProgress, IngestStatus};
pub use telearc_ingest::DateWindow;
pub use telearc_storage::StoredMessage;
