// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assembled archiver: one facade over auth, storage, and ingestion.

use std::sync::Arc;

use telearc_auth::AuthMachine;
use telearc_config::TelearcConfig;
use telearc_core::error::ArchiveError;
use telearc_core::traits::SessionClient;
use telearc_core::types::{AuthProbe, ChatSummary, IngestProgress};
use telearc_ingest::{DateWindow, IngestEngine};
use telearc_storage::queries::messages;
use telearc_storage::{Database, StoredMessage};
use telearc_vault::Vault;

/// Wires the database, vault, auth machine, and ingestion engine together
/// behind one API surface.
pub struct ArchiveService {
    auth: Arc<AuthMachine>,
    engine: Arc<IngestEngine>,
    db: Database,
    chat_list_limit: usize,
}

impl ArchiveService {
    /// Open storage at the configured path and assemble the service around
    /// the given session client backend.
    pub async fn new(
        config: &TelearcConfig,
        client: Arc<dyn SessionClient>,
    ) -> Result<Self, ArchiveError> {
        let db = Database::open(
            &config.storage.database_path,
            config.storage.busy_timeout_ms,
        )
        .await?;
        let vault = Vault::from_key_material(&config.vault.secret_key);
        let auth = Arc::new(AuthMachine::new(client, db.clone(), vault));
        let engine = Arc::new(IngestEngine::new(auth.clone(), db.clone(), &config.ingest));

        Ok(ArchiveService {
            auth,
            engine,
            db,
            chat_list_limit: config.ingest.chat_list_limit,
        })
    }

    /// Start a login for `phone`: the platform sends a verification code.
    pub async fn request_code(&self, phone: &str) -> Result<(), ArchiveError> {
        self.auth.request_code(phone).await
    }

    /// Complete the pending login for `phone` with the received code.
    pub async fn confirm_code(&self, phone: &str, code: &str) -> Result<(), ArchiveError> {
        self.auth.confirm_code(phone, code).await
    }

    /// Current credential status, verified against the live platform when a
    /// stored credential claims to be valid.
    pub async fn auth_status(&self) -> Result<AuthProbe, ArchiveError> {
        self.auth.status().await
    }

    /// Forget the stored credential. Idempotent; archived messages stay.
    pub async fn reset_session(&self) -> Result<(), ArchiveError> {
        self.auth.reset().await
    }

    /// List the account's chats, newest activity first.
    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>, ArchiveError> {
        let conn = self.auth.connection().await?;
        match conn.list_chats(self.chat_list_limit).await {
            Ok(chats) => Ok(chats),
            Err(err) => Err(self.auth.observe_client_error(err).await),
        }
    }

    /// Start archiving a chat in the background, optionally restricted to a
    /// date window.
    pub fn start_ingest(&self, chat_id: i64, window: DateWindow) -> Result<(), ArchiveError> {
        self.engine.start(chat_id, window)
    }

    /// Progress of the current (or last) ingestion job.
    pub fn ingest_progress(&self) -> IngestProgress {
        self.engine.progress()
    }

    /// Read one page of a chat's archive, newest first.
    pub async fn read_messages(
        &self,
        chat_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoredMessage>, ArchiveError> {
        messages::read_page(&self.db, chat_id, limit, offset).await
    }

    /// Total number of archived messages across all chats.
    pub async fn archived_total(&self) -> Result<i64, ArchiveError> {
        messages::total_count(&self.db).await
    }

    /// Checkpoint and release the database.
    pub async fn shutdown(&self) -> Result<(), ArchiveError> {
        self.db.close().await
    }
}
