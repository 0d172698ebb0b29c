// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History ingestion for the Telearc archiver.
//!
//! One background job at a time pages a chat's history backward and archives
//! text-bearing messages idempotently. See [`IngestEngine`].

pub mod engine;
pub mod progress;

pub use engine::{DateWindow, IngestEngine};
pub use progress::JobState;
