// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry and backoff primitives shared across Telearc crates.

pub mod retry;

pub use retry::{RetryPolicy, retry};
