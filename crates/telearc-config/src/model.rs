// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Telearc archiver.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Everything is loaded once at process start and
//! immutable thereafter.

use serde::{Deserialize, Serialize};

/// Top-level Telearc configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelearcConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Platform API credentials.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ingestion pipeline tuning.
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Process-wide archiver settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Platform API credentials (numeric application id + secret hash).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Numeric application id issued by the platform. `0` means unset.
    #[serde(default)]
    pub api_id: u32,

    /// Application secret issued by the platform.
    #[serde(default)]
    pub api_hash: Option<String>,
}

/// Credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Symmetric key material protecting the stored session secret.
    /// Normalized to the cipher's 32-byte key length; one key per process
    /// lifetime, no rotation.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
        }
    }
}

fn default_secret_key() -> String {
    "default-secret-key-32-chars-long".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("telearc").join("telearc.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("telearc.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

/// Ingestion pipeline tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// History page size requested from the platform.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between history pages, to stay under flood control.
    #[serde(default = "default_inter_batch_pause_ms")]
    pub inter_batch_pause_ms: u64,

    /// Attempts per message write before the message is dropped.
    #[serde(default = "default_write_attempts")]
    pub write_attempts: u32,

    /// Base backoff delay for write retries; doubles per attempt.
    #[serde(default = "default_write_backoff_ms")]
    pub write_backoff_ms: u64,

    /// Maximum number of chats returned by a chat listing.
    #[serde(default = "default_chat_list_limit")]
    pub chat_list_limit: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            inter_batch_pause_ms: default_inter_batch_pause_ms(),
            write_attempts: default_write_attempts(),
            write_backoff_ms: default_write_backoff_ms(),
            chat_list_limit: default_chat_list_limit(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_inter_batch_pause_ms() -> u64 {
    1000
}

fn default_write_attempts() -> u32 {
    3
}

fn default_write_backoff_ms() -> u64 {
    1000
}

fn default_chat_list_limit() -> usize {
    100
}
