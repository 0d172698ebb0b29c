// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached live connection state.

use std::sync::Arc;

use telearc_core::traits::SessionConnection;

/// Whether a live platform connection is currently held.
///
/// Guarded by the auth machine's mutex: reconnection happens under the lock,
/// so at most one live connection exists at a time.
pub(crate) enum ConnectionState {
    Disconnected,
    Connected(Arc<dyn SessionConnection>),
}

impl ConnectionState {
    pub(crate) fn take_connected(&mut self) -> Option<Arc<dyn SessionConnection>> {
        match std::mem::replace(self, ConnectionState::Disconnected) {
            ConnectionState::Connected(conn) => Some(conn),
            ConnectionState::Disconnected => None,
        }
    }
}
