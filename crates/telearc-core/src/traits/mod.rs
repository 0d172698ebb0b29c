// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the system's external seams.

pub mod client;

pub use client::{SessionClient, SessionConnection};
