// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archived-message CRUD operations.

use rusqlite::params;

use telearc_core::ArchiveError;

use crate::database::Database;
use crate::models::StoredMessage;

/// Insert a message unless its `(chat_id, msg_id)` key is already archived.
///
/// Returns `true` when a row was written, `false` when the message was
/// already present. Re-ingesting a chat is therefore safe by construction.
pub async fn insert_if_absent(db: &Database, msg: &StoredMessage) -> Result<bool, ArchiveError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO messages
                    (chat_id, msg_id, sender_id, sender_name, text, date,
                     is_reply, reply_to_msg_id, entities, raw_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    msg.chat_id,
                    msg.msg_id,
                    msg.sender_id,
                    msg.sender_name,
                    msg.text,
                    msg.date,
                    msg.is_reply,
                    msg.reply_to_msg_id,
                    msg.entities,
                    msg.raw_json,
                ],
            )?;
            Ok(inserted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether a message is already archived.
pub async fn exists(db: &Database, chat_id: i64, msg_id: i64) -> Result<bool, ArchiveError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE chat_id = ?1 AND msg_id = ?2",
                params![chat_id, msg_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of archived messages for one chat.
pub async fn count_for_chat(db: &Database, chat_id: i64) -> Result<i64, ArchiveError> {
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Archived message count per chat, largest archive first.
pub async fn counts_by_chat(db: &Database) -> Result<Vec<(i64, i64)>, ArchiveError> {
    db.connection()
        .call(|conn| -> Result<Vec<(i64, i64)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, COUNT(*) FROM messages
                 GROUP BY chat_id ORDER BY COUNT(*) DESC, chat_id",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut counts = Vec::new();
            for row in rows {
                counts.push(row?);
            }
            Ok(counts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of archived messages across all chats.
pub async fn total_count(db: &Database) -> Result<i64, ArchiveError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read one page of a chat's archive, newest first.
pub async fn read_page(
    db: &Database,
    chat_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<StoredMessage>, ArchiveError> {
    db.connection()
        .call(move |conn| -> Result<Vec<StoredMessage>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, msg_id, sender_id, sender_name, text, date,
                        is_reply, reply_to_msg_id, entities, raw_json
                 FROM messages WHERE chat_id = ?1
                 ORDER BY date DESC LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt.query_map(params![chat_id, limit, offset], |row| {
                Ok(StoredMessage {
                    chat_id: row.get(0)?,
                    msg_id: row.get(1)?,
                    sender_id: row.get(2)?,
                    sender_name: row.get(3)?,
                    text: row.get(4)?,
                    date: row.get(5)?,
                    is_reply: row.get(6)?,
                    reply_to_msg_id: row.get(7)?,
                    entities: row.get(8)?,
                    raw_json: row.get(9)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
