// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use tracing::debug;

use telearc_core::ArchiveError;

use crate::migrations;

/// Handle to the archive database.
///
/// Cloning is cheap: clones share the same background connection thread, so
/// every clone still goes through the single writer.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, busy_timeout_ms: u32) -> Result<Self, ArchiveError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(ArchiveError::storage)?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::from(e)))?;

        conn.call(move |c| -> Result<(), rusqlite::Error> {
            c.execute_batch(&format!(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = {busy_timeout_ms};
                 PRAGMA foreign_keys = ON;"
            ))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(move |c| -> Result<(), refinery::Error> {
            migrations::run_migrations(c)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened, migrations applied");
        Ok(Database { conn })
    }

    /// The underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), ArchiveError> {
        self.conn
            .call(|c| -> Result<(), rusqlite::Error> {
                c.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error (around any inner error type) into the storage
/// error category.
pub(crate) fn map_tr_err<E: std::fmt::Display>(e: tokio_rusqlite::Error<E>) -> ArchiveError {
    ArchiveError::Storage {
        source: format!("{e}").into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/deeper/archive.db");
        let db = Database::open(db_path.to_str().unwrap(), 5000).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_is_idempotent_across_restarts() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("archive.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path, 5000).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        // Second open re-runs the migration runner, which must be a no-op.
        let db = Database::open(path, 5000).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn wal_mode_is_active() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("wal.db");
        let db = Database::open(db_path.to_str().unwrap(), 5000).await.unwrap();

        let mode: String = db
            .connection()
            .call(|c| -> Result<String, rusqlite::Error> {
                c.query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");

        db.close().await.unwrap();
    }
}
