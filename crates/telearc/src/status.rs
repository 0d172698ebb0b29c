// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `telearc status` command implementation.
//!
//! Reads the stored credential and archive counters directly from the
//! database, without contacting the platform. The status shown for the
//! credential is the last persisted one; live verification happens in the
//! service layer, not here.

use telearc_config::TelearcConfig;
use telearc_core::error::ArchiveError;
use telearc_storage::Database;
use telearc_storage::queries::{credential, messages};

/// Print an offline snapshot of the archiver's state.
pub async fn run_status(config: TelearcConfig) -> Result<(), ArchiveError> {
    let db = Database::open(
        &config.storage.database_path,
        config.storage.busy_timeout_ms,
    )
    .await?;

    println!("database: {}", config.storage.database_path);

    match credential::load(&db).await? {
        Some(record) => {
            println!("credential: {}", record.status);
            if let Some(phone) = record.phone {
                println!("phone: {phone}");
            }
            println!("updated: {}", record.updated_at);
        }
        None => println!("credential: empty"),
    }

    let total = messages::total_count(&db).await?;
    println!("archived messages: {total}");
    for (chat_id, count) in messages::counts_by_chat(&db).await? {
        println!("  chat {chat_id}: {count}");
    }

    db.close().await?;
    Ok(())
}
