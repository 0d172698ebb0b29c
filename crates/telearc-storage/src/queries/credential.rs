// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operations on the singleton credential row.
//!
//! Each state transition is a single SQL statement, so concurrent callers
//! serialize through the connection thread and never observe a half-applied
//! transition.

use rusqlite::{OptionalExtension, params};

use telearc_core::ArchiveError;

use crate::database::Database;
use crate::models::CredentialRecord;

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Load the credential row, if any login was ever started.
pub async fn load(db: &Database) -> Result<Option<CredentialRecord>, ArchiveError> {
    db.connection()
        .call(|conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT phone, encrypted_secret, pending_login_token, status, updated_at
                 FROM credential WHERE id = 1",
                [],
                |row| {
                    Ok(CredentialRecord {
                        phone: row.get(0)?,
                        encrypted_secret: row.get(1)?,
                        pending_login_token: row.get(2)?,
                        status: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record a newly requested login: store the phone and the platform's login
/// token, drop any previous secret, and move to `pending`.
///
/// A repeated request simply overwrites the previous pending state.
pub async fn begin_pending(db: &Database, phone: &str, token: &str) -> Result<(), ArchiveError> {
    let phone = phone.to_string();
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO credential (id, phone, encrypted_secret, pending_login_token, status, updated_at)
                     VALUES (1, ?1, NULL, ?2, 'pending', {NOW})
                     ON CONFLICT(id) DO UPDATE SET
                        phone = excluded.phone,
                        encrypted_secret = NULL,
                        pending_login_token = excluded.pending_login_token,
                        status = 'pending',
                        updated_at = excluded.updated_at"
                ),
                params![phone, token],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Store the sealed session secret after a confirmed login and move to
/// `valid`. Clears the consumed login token.
pub async fn store_secret(db: &Database, encrypted_secret: &str) -> Result<(), ArchiveError> {
    let encrypted_secret = encrypted_secret.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "UPDATE credential SET
                        encrypted_secret = ?1,
                        pending_login_token = NULL,
                        status = 'valid',
                        updated_at = {NOW}
                     WHERE id = 1"
                ),
                params![encrypted_secret],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark the stored credential as rejected by the platform.
///
/// The encrypted secret is kept for forensics; only the status flips, so the
/// row never silently reverts to `valid`.
pub async fn mark_invalid(db: &Database) -> Result<(), ArchiveError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "UPDATE credential SET
                        pending_login_token = NULL,
                        status = 'invalid',
                        updated_at = {NOW}
                     WHERE id = 1"
                ),
                [],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove the credential row entirely. Idempotent.
pub async fn clear(db: &Database) -> Result<(), ArchiveError> {
    db.connection()
        .call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM credential WHERE id = 1", [])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), 5000).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn load_returns_none_before_any_login() {
        let (db, _dir) = open_db().await;
        assert!(load(&db).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn begin_pending_creates_singleton_row() {
        let (db, _dir) = open_db().await;

        begin_pending(&db, "+15551234567", "token-1").await.unwrap();

        let record = load(&db).await.unwrap().unwrap();
        assert_eq!(record.phone.as_deref(), Some("+15551234567"));
        assert_eq!(record.pending_login_token.as_deref(), Some("token-1"));
        assert_eq!(record.status, "pending");
        assert!(record.encrypted_secret.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn repeated_begin_pending_overwrites_previous_request() {
        let (db, _dir) = open_db().await;

        begin_pending(&db, "+15551234567", "token-1").await.unwrap();
        begin_pending(&db, "+15559876543", "token-2").await.unwrap();

        let record = load(&db).await.unwrap().unwrap();
        assert_eq!(record.phone.as_deref(), Some("+15559876543"));
        assert_eq!(record.pending_login_token.as_deref(), Some("token-2"));
        assert_eq!(record.status, "pending");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn store_secret_moves_to_valid_and_clears_token() {
        let (db, _dir) = open_db().await;

        begin_pending(&db, "+15551234567", "token-1").await.unwrap();
        store_secret(&db, "sealed-envelope").await.unwrap();

        let record = load(&db).await.unwrap().unwrap();
        assert_eq!(record.status, "valid");
        assert_eq!(record.encrypted_secret.as_deref(), Some("sealed-envelope"));
        assert!(record.pending_login_token.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_invalid_keeps_secret_but_flips_status() {
        let (db, _dir) = open_db().await;

        begin_pending(&db, "+15551234567", "token-1").await.unwrap();
        store_secret(&db, "sealed-envelope").await.unwrap();
        mark_invalid(&db).await.unwrap();

        let record = load(&db).await.unwrap().unwrap();
        assert_eq!(record.status, "invalid");
        assert_eq!(record.encrypted_secret.as_deref(), Some("sealed-envelope"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (db, _dir) = open_db().await;

        begin_pending(&db, "+15551234567", "token-1").await.unwrap();
        clear(&db).await.unwrap();
        assert!(load(&db).await.unwrap().is_none());

        // Clearing again must not fail.
        clear(&db).await.unwrap();

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn new_login_after_invalid_resets_state() {
        let (db, _dir) = open_db().await;

        begin_pending(&db, "+15551234567", "token-1").await.unwrap();
        store_secret(&db, "old-envelope").await.unwrap();
        mark_invalid(&db).await.unwrap();

        begin_pending(&db, "+15551234567", "token-2").await.unwrap();
        let record = load(&db).await.unwrap().unwrap();
        assert_eq!(record.status, "pending");
        assert!(record.encrypted_secret.is_none());

        db.close().await.unwrap();
    }
}
