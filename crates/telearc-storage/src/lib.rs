// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Telearc archiver.
//!
//! Owns the schema (embedded refinery migrations), the single-writer
//! connection ([`Database`]), and typed query modules for the credential
//! singleton and the message archive.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::{CredentialRecord, StoredMessage};
