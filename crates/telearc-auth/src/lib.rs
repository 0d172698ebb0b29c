// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential lifecycle for the Telearc archiver.
//!
//! [`AuthMachine`] drives the login flow (request code, confirm code),
//! verifies stored credentials against the live platform, and hands out the
//! cached live connection the ingestion engine runs on.

mod connection;
pub mod machine;

pub use machine::AuthMachine;
