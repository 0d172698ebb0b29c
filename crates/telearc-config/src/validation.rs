// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes.

use crate::diagnostic::ConfigError;
use crate::model::TelearcConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors (does not fail fast).
pub fn validate_config(config: &TelearcConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.archive.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "archive.log_level must be one of {LOG_LEVELS:?}, got `{}`",
                config.archive.log_level
            ),
        });
    }

    if config.vault.secret_key.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.secret_key must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.ingest.batch_size == 0 {
        errors.push(ConfigError::Validation {
            message: "ingest.batch_size must be at least 1".to_string(),
        });
    }

    if config.ingest.write_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "ingest.write_attempts must be at least 1".to_string(),
        });
    }

    if config.ingest.chat_list_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "ingest.chat_list_limit must be at least 1".to_string(),
        });
    }

    if let Some(hash) = &config.platform.api_hash {
        if hash.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "platform.api_hash must not be empty when set".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
