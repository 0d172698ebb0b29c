// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test fixtures for Telearc crates.

pub mod mock_client;

pub use mock_client::{
    MockSessionClient, MockSessionConnection, Script, at, reply_message, service_message,
    text_message,
};
