// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./telearc.toml` > `~/.config/telearc/telearc.toml`
//! > `/etc/telearc/telearc.toml` with environment variable overrides via the
//! `TELEARC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TelearcConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/telearc/telearc.toml` (system-wide)
/// 3. `~/.config/telearc/telearc.toml` (user XDG config)
/// 4. `./telearc.toml` (local directory)
/// 5. `TELEARC_*` environment variables
pub fn load_config() -> Result<TelearcConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TelearcConfig::default()))
        .merge(Toml::file("/etc/telearc/telearc.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("telearc/telearc.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("telearc.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TelearcConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TelearcConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TelearcConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TelearcConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TELEARC_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("TELEARC_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TELEARC_VAULT_SECRET_KEY -> "vault_secret_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("archive_", "archive.", 1)
            .replacen("platform_", "platform.", 1)
            .replacen("vault_", "vault.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("ingest_", "ingest.", 1);
        mapped.into()
    })
}
