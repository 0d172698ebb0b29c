// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the assembled archiver service over a scripted
//! session client.

use std::sync::Arc;
use std::time::Duration;

use telearc::{ArchiveService, ArchiveError, AuthStatus, DateWindow, IngestStatus, TelearcConfig};
use telearc_test_utils::MockSessionClient;
use tempfile::tempdir;

fn make_config(dir: &tempfile::TempDir) -> TelearcConfig {
    let mut config = TelearcConfig::default();
    config.storage.database_path = dir
        .path()
        .join("telearc.db")
        .to_string_lossy()
        .into_owned();
    config.vault.secret_key = "integration-test-key".to_string();
    config
}

async fn wait_terminal(service: &ArchiveService) -> telearc::IngestProgress {
    loop {
        let progress = service.ingest_progress();
        if matches!(
            progress.status,
            IngestStatus::Completed | IngestStatus::Failed
        ) {
            return progress;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn full_login_ingest_and_read_flow() {
    let client = MockSessionClient::new().with_chat(7, "readers", 42, 12);
    let dir = tempdir().unwrap();
    let config = make_config(&dir);

    let service = ArchiveService::new(&config, Arc::new(client))
        .await
        .unwrap();

    // Fresh install: nothing stored.
    assert_eq!(service.auth_status().await.unwrap().status, AuthStatus::Empty);

    // Login.
    service.request_code("+15551234567").await.unwrap();
    assert_eq!(
        service.auth_status().await.unwrap().status,
        AuthStatus::Pending
    );
    service.confirm_code("+15551234567", "12345").await.unwrap();
    assert_eq!(service.auth_status().await.unwrap().status, AuthStatus::Valid);

    // The account's chats are visible.
    let chats = service.list_chats().await.unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].title, "readers");

    // Archive the chat.
    service.start_ingest(7, DateWindow::default()).unwrap();
    let progress = wait_terminal(&service).await;
    assert_eq!(progress.status, IngestStatus::Completed);
    assert_eq!(progress.fraction_complete, 1.0);
    assert_eq!(progress.messages_processed, 12);

    // Read it back, newest first.
    let page = service.read_messages(7, 5, 0).await.unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].msg_id, 12);
    assert_eq!(service.archived_total().await.unwrap(), 12);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn archive_survives_credential_reset() {
    let client = MockSessionClient::new().with_chat(7, "readers", 42, 3);
    let dir = tempdir().unwrap();
    let config = make_config(&dir);

    let service = ArchiveService::new(&config, Arc::new(client))
        .await
        .unwrap();
    service.request_code("+15551234567").await.unwrap();
    service.confirm_code("+15551234567", "12345").await.unwrap();

    service.start_ingest(7, DateWindow::default()).unwrap();
    wait_terminal(&service).await;
    assert_eq!(service.archived_total().await.unwrap(), 3);

    // Resetting the session keeps the archive.
    service.reset_session().await.unwrap();
    assert_eq!(service.auth_status().await.unwrap().status, AuthStatus::Empty);
    assert_eq!(service.archived_total().await.unwrap(), 3);

    // Reads still work without any credential.
    let page = service.read_messages(7, 10, 0).await.unwrap();
    assert_eq!(page.len(), 3);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn list_chats_requires_a_session() {
    let dir = tempdir().unwrap();
    let config = make_config(&dir);

    let service = ArchiveService::new(&config, Arc::new(MockSessionClient::new()))
        .await
        .unwrap();

    let err = service.list_chats().await.unwrap_err();
    assert!(matches!(err, ArchiveError::NoValidSession));

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn state_survives_process_restart() {
    let client = MockSessionClient::new().with_chat(7, "readers", 42, 3);
    let dir = tempdir().unwrap();
    let config = make_config(&dir);

    {
        let service = ArchiveService::new(&config, Arc::new(client.clone()))
            .await
            .unwrap();
        service.request_code("+15551234567").await.unwrap();
        service.confirm_code("+15551234567", "12345").await.unwrap();
        service.start_ingest(7, DateWindow::default()).unwrap();
        wait_terminal(&service).await;
        service.shutdown().await.unwrap();
    }

    // Same database and vault key: the credential and archive carry over.
    let service = ArchiveService::new(&config, Arc::new(client)).await.unwrap();
    assert_eq!(service.auth_status().await.unwrap().status, AuthStatus::Valid);
    assert_eq!(service.archived_total().await.unwrap(), 3);

    service.shutdown().await.unwrap();
}
