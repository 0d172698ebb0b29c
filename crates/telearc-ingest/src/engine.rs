// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single-flight history ingestion engine.
//!
//! One job at a time walks a chat's history backward from the newest message
//! in fixed-size pages, filters to text-bearing messages, and writes each one
//! idempotently. Flood waits from the platform are honored exactly and the
//! same page is re-fetched; per-message write failures are retried with
//! exponential backoff and then dropped, never failing the whole job.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, error, info, warn};

use telearc_auth::AuthMachine;
use telearc_config::model::IngestConfig;
use telearc_core::error::{ArchiveError, ClientError};
use telearc_core::types::{IngestProgress, RawMessage, UNKNOWN_SENDER};
use telearc_resilience::{RetryPolicy, retry};
use telearc_storage::queries::messages;
use telearc_storage::{Database, StoredMessage};

use crate::progress::JobState;

/// Optional date window restricting which messages are archived.
///
/// Pagination still walks the full history; the window filters per record,
/// so edits to it never disturb the cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateWindow {
    fn contains(&self, date: DateTime<Utc>) -> bool {
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }
}

/// Drives ingestion jobs against the auth machine's live connection.
pub struct IngestEngine {
    auth: Arc<AuthMachine>,
    db: Database,
    state: JobState,
    write_policy: RetryPolicy,
    batch_size: usize,
    inter_batch_pause: Duration,
}

impl IngestEngine {
    pub fn new(auth: Arc<AuthMachine>, db: Database, config: &IngestConfig) -> Self {
        IngestEngine {
            auth,
            db,
            state: JobState::new(),
            write_policy: RetryPolicy::new(
                config.write_attempts,
                Duration::from_millis(config.write_backoff_ms),
            ),
            batch_size: config.batch_size,
            inter_batch_pause: Duration::from_millis(config.inter_batch_pause_ms),
        }
    }

    /// Start archiving `chat_id` in the background.
    ///
    /// Returns immediately once the job slot is claimed; progress is observed
    /// through [`progress`](Self::progress). Fails with
    /// [`ArchiveError::AlreadyRunning`] while another job holds the slot.
    /// The job always reaches a terminal state: even a panic in the pipeline
    /// is reported as a failed job rather than wedging the slot.
    pub fn start(
        self: &Arc<Self>,
        chat_id: i64,
        window: DateWindow,
    ) -> Result<(), ArchiveError> {
        let label = format!("chat {chat_id}");
        if !self.state.try_begin(&label) {
            return Err(ArchiveError::AlreadyRunning);
        }

        info!(chat_id, "ingestion started");
        let engine = self.clone();
        tokio::spawn(async move {
            // The pipeline runs in its own task so that a panic surfaces
            // here as a JoinError instead of leaving the slot at Running.
            let task = tokio::spawn({
                let engine = engine.clone();
                async move { engine.pipeline(chat_id, window).await }
            });
            match task.await {
                Ok(Ok(inserted)) => {
                    info!(chat_id, inserted, "ingestion completed");
                    engine.state.complete();
                }
                Ok(Err(err)) => {
                    error!(chat_id, error = %err, "ingestion failed");
                    engine.state.fail(format!("error: {err}"));
                }
                Err(join_err) => {
                    error!(chat_id, error = %join_err, "ingestion task aborted");
                    engine.state.fail(format!("aborted: {join_err}"));
                }
            }
        });
        Ok(())
    }

    /// Snapshot of the current (or last) job.
    pub fn progress(&self) -> IngestProgress {
        self.state.snapshot()
    }

    async fn pipeline(&self, chat_id: i64, window: DateWindow) -> Result<u64, ArchiveError> {
        let conn = self.auth.connection().await?;

        let chat = match conn.resolve_chat(chat_id).await {
            Ok(chat) => chat,
            Err(err) => return Err(self.auth.observe_client_error(err).await),
        };

        let baseline = messages::count_for_chat(&self.db, chat_id).await? as u64;
        self.state.set_baseline(baseline);

        let mut processed_total = baseline;
        let mut inserted_run: u64 = 0;
        let mut cursor: i64 = 0;

        loop {
            let batch = match conn.fetch_history(&chat, cursor, self.batch_size).await {
                Ok(batch) => batch,
                Err(ClientError::RateLimited { wait }) => {
                    warn!(chat_id, wait_secs = wait.as_secs(), "flood wait, holding page");
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Err(err) => return Err(self.auth.observe_client_error(err).await),
            };

            let Some(oldest) = batch.last().map(|m| m.id) else {
                break;
            };
            let batch_len = batch.len();

            for msg in batch {
                let Some(text) = msg.text.clone().filter(|t| !t.is_empty()) else {
                    continue;
                };
                if !window.contains(msg.date) {
                    continue;
                }

                let sender_name = self.resolve_sender_name(&*conn, &msg).await;
                let stored = build_record(chat_id, &msg, sender_name, text);

                let written = retry(self.write_policy, "message write", || {
                    let db = self.db.clone();
                    let stored = stored.clone();
                    async move { messages::insert_if_absent(&db, &stored).await }
                })
                .await;

                match written {
                    Ok(true) => {
                        processed_total += 1;
                        inserted_run += 1;
                        self.state.record_insert(processed_total, inserted_run);
                    }
                    Ok(false) => {
                        debug!(chat_id, msg_id = msg.id, "already archived, skipped");
                    }
                    Err(err) => {
                        // The job outlives any single message.
                        error!(chat_id, msg_id = msg.id, error = %err, "message dropped after retries");
                    }
                }
            }

            cursor = oldest;
            if batch_len < self.batch_size {
                break;
            }
            tokio::time::sleep(self.inter_batch_pause).await;
        }

        Ok(inserted_run)
    }

    async fn resolve_sender_name(
        &self,
        conn: &dyn telearc_core::traits::SessionConnection,
        msg: &RawMessage,
    ) -> String {
        let Some(sender_id) = msg.sender_id else {
            return UNKNOWN_SENDER.to_string();
        };
        match conn.resolve_sender(sender_id).await {
            Ok(info) => info.display_name(),
            Err(err) => {
                debug!(sender_id, error = %err, "sender resolution failed");
                UNKNOWN_SENDER.to_string()
            }
        }
    }
}

fn build_record(chat_id: i64, msg: &RawMessage, sender_name: String, text: String) -> StoredMessage {
    StoredMessage {
        chat_id,
        msg_id: msg.id,
        sender_id: msg.sender_id,
        sender_name,
        text,
        date: msg.date.to_rfc3339_opts(SecondsFormat::Millis, true),
        is_reply: msg.reply.is_some(),
        reply_to_msg_id: msg.reply.as_ref().and_then(|r| r.message_id),
        entities: msg.entities.as_ref().map(|e| e.to_string()),
        raw_json: msg.raw.to_string(),
    }
}
