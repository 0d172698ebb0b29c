// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The credential lifecycle state machine.
//!
//! Exactly one credential exists, persisted as the singleton row in storage.
//! Its status moves through `empty -> pending -> valid`, with `invalid` as
//! the terminal state for any rejection. `valid` is an optimistic claim:
//! [`AuthMachine::status`] re-verifies it against the live platform and
//! demotes to `invalid` on any failure, so a status can flip from `valid` to
//! `invalid` but never silently back.

use std::str::FromStr;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use telearc_core::error::{ArchiveError, ClientError};
use telearc_core::traits::{SessionClient, SessionConnection};
use telearc_core::types::{AuthProbe, AuthStatus};
use telearc_storage::Database;
use telearc_storage::queries::credential;
use telearc_vault::Vault;

use crate::connection::ConnectionState;

/// Owns the stored credential, the vault that seals it, and the cached live
/// connection derived from it.
pub struct AuthMachine {
    client: Arc<dyn SessionClient>,
    db: Database,
    vault: Vault,
    conn: Mutex<ConnectionState>,
}

impl AuthMachine {
    pub fn new(client: Arc<dyn SessionClient>, db: Database, vault: Vault) -> Self {
        AuthMachine {
            client,
            db,
            vault,
            conn: Mutex::new(ConnectionState::Disconnected),
        }
    }

    /// Start a login: ask the platform to send a code to `phone` and move the
    /// credential to `pending`.
    ///
    /// A repeated request overwrites the previous pending state; any cached
    /// connection from an earlier credential is dropped.
    pub async fn request_code(&self, phone: &str) -> Result<(), ArchiveError> {
        let token = match self.client.request_login_code(phone).await {
            Ok(token) => token,
            Err(ClientError::InvalidPhone(detail)) => {
                debug!(detail, "platform rejected phone number");
                return Err(ArchiveError::InvalidPhone(detail));
            }
            Err(err) => {
                warn!(error = %err, "login code request failed");
                return Err(ArchiveError::Internal(format!(
                    "login code request failed: {err}"
                )));
            }
        };

        self.drop_connection().await;
        credential::begin_pending(&self.db, phone, &token.0).await?;
        debug!(phone, "login pending, code sent");
        Ok(())
    }

    /// Complete the pending login with the user-supplied code.
    ///
    /// `phone` must match the number the code was requested for. On success
    /// the issued session secret is sealed into the vault and the credential
    /// becomes `valid`. On platform rejection the credential becomes
    /// `invalid`. With no pending request, storage is left untouched.
    pub async fn confirm_code(&self, phone: &str, code: &str) -> Result<(), ArchiveError> {
        let record = credential::load(&self.db).await?;
        let token = match record {
            Some(record) => match (record.phone, record.pending_login_token) {
                (Some(pending_phone), Some(token))
                    if record.status == AuthStatus::Pending.to_string()
                        && pending_phone == phone =>
                {
                    telearc_core::types::LoginToken(token)
                }
                _ => return Err(ArchiveError::NoPendingRequest),
            },
            None => return Err(ArchiveError::NoPendingRequest),
        };

        match self.client.confirm_login(phone, code, &token).await {
            Ok(secret) => {
                let envelope = self.vault.encrypt(&secret)?;
                credential::store_secret(&self.db, &envelope).await?;
                debug!(phone, "login confirmed, session secret sealed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                credential::mark_invalid(&self.db).await?;
                Err(ArchiveError::CodeConfirmation(err.to_string()))
            }
        }
    }

    /// Report the credential status, verifying a stored `valid` claim against
    /// the live platform.
    ///
    /// Any probe failure demotes the credential to `invalid` (fail closed);
    /// only storage faults surface as errors.
    pub async fn status(&self) -> Result<AuthProbe, ArchiveError> {
        let record = match credential::load(&self.db).await? {
            Some(record) => record,
            None => {
                return Ok(AuthProbe {
                    status: AuthStatus::Empty,
                    phone: None,
                });
            }
        };

        // Unknown status strings are treated as a dead credential.
        let stored = AuthStatus::from_str(&record.status).unwrap_or(AuthStatus::Invalid);
        let phone = record.phone.clone();

        if stored != AuthStatus::Valid {
            return Ok(AuthProbe {
                status: stored,
                phone,
            });
        }

        if record.encrypted_secret.is_none() {
            credential::mark_invalid(&self.db).await?;
            return Ok(AuthProbe {
                status: AuthStatus::Invalid,
                phone,
            });
        }

        match self.probe_live().await {
            Ok(()) => Ok(AuthProbe {
                status: AuthStatus::Valid,
                phone,
            }),
            Err(err @ ArchiveError::Storage { .. }) => Err(err),
            Err(err) => {
                debug!(error = %err, "liveness probe failed, credential demoted");
                self.drop_connection().await;
                credential::mark_invalid(&self.db).await?;
                Ok(AuthProbe {
                    status: AuthStatus::Invalid,
                    phone,
                })
            }
        }
    }

    /// Forget the stored credential and drop any live connection. Idempotent.
    pub async fn reset(&self) -> Result<(), ArchiveError> {
        self.drop_connection().await;
        credential::clear(&self.db).await?;
        debug!("credential cleared");
        Ok(())
    }

    /// A live connection for the stored credential, reusing the cached one
    /// when present.
    pub async fn connection(&self) -> Result<Arc<dyn SessionConnection>, ArchiveError> {
        let mut guard = self.conn.lock().await;
        if let ConnectionState::Connected(conn) = &*guard {
            return Ok(conn.clone());
        }

        let record = credential::load(&self.db).await?;
        let envelope = match record {
            Some(record) if record.status == AuthStatus::Valid.to_string() => {
                match record.encrypted_secret {
                    Some(envelope) => envelope,
                    None => return Err(ArchiveError::NoValidSession),
                }
            }
            _ => return Err(ArchiveError::NoValidSession),
        };

        let secret = match self.vault.decrypt(&envelope) {
            Ok(secret) => secret,
            Err(err) => {
                warn!(error = %err, "stored secret unusable");
                credential::mark_invalid(&self.db).await?;
                return Err(err);
            }
        };

        match self.client.reconnect(secret.expose_secret()).await {
            Ok(conn) => {
                *guard = ConnectionState::Connected(conn.clone());
                debug!("live connection established");
                Ok(conn)
            }
            Err(err) => {
                *guard = ConnectionState::Disconnected;
                drop(guard);
                Err(self.observe_client_error(err).await)
            }
        }
    }

    /// Fold a platform error into the credential lifecycle: conditions that
    /// mean the credential is dead drop the cached connection and persist
    /// `invalid`. Returns the error to surface to the caller.
    pub async fn observe_client_error(&self, err: ClientError) -> ArchiveError {
        if err.invalidates_credential() {
            warn!(error = %err, "platform rejected the stored credential");
            self.drop_connection().await;
            if let Err(storage_err) = credential::mark_invalid(&self.db).await {
                warn!(error = %storage_err, "failed to persist credential invalidation");
            }
            return ArchiveError::SessionRejected;
        }
        match err {
            ClientError::InvalidPhone(detail) => ArchiveError::InvalidPhone(detail),
            ClientError::CodeRejected(detail) => ArchiveError::CodeConfirmation(detail),
            other => ArchiveError::Internal(format!("platform call failed: {other}")),
        }
    }

    async fn probe_live(&self) -> Result<(), ArchiveError> {
        let conn = self.connection().await?;
        match conn.whoami().await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.observe_client_error(err).await),
        }
    }

    async fn drop_connection(&self) {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take_connected() {
            drop(guard);
            if let Err(err) = conn.disconnect().await {
                debug!(error = %err, "disconnect failed");
            }
        }
    }
}
