// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Telearc configuration system.

use telearc_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[archive]
log_level = "debug"

[platform]
api_id = 123456
api_hash = "0123456789abcdef"

[vault]
secret_key = "an-operator-chosen-symmetric-key"

[storage]
database_path = "/tmp/telearc-test.db"
busy_timeout_ms = 2500

[ingest]
batch_size = 50
inter_batch_pause_ms = 500
write_attempts = 5
write_backoff_ms = 250
chat_list_limit = 20
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.archive.log_level, "debug");
    assert_eq!(config.platform.api_id, 123456);
    assert_eq!(config.platform.api_hash.as_deref(), Some("0123456789abcdef"));
    assert_eq!(config.vault.secret_key, "an-operator-chosen-symmetric-key");
    assert_eq!(config.storage.database_path, "/tmp/telearc-test.db");
    assert_eq!(config.storage.busy_timeout_ms, 2500);
    assert_eq!(config.ingest.batch_size, 50);
    assert_eq!(config.ingest.inter_batch_pause_ms, 500);
    assert_eq!(config.ingest.write_attempts, 5);
    assert_eq!(config.ingest.write_backoff_ms, 250);
    assert_eq!(config.ingest.chat_list_limit, 20);
}

/// An empty config falls back to compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.archive.log_level, "warn");
    assert_eq!(config.platform.api_id, 0);
    assert!(config.platform.api_hash.is_none());
    assert_eq!(config.ingest.batch_size, 100);
    assert_eq!(config.ingest.inter_batch_pause_ms, 1000);
    assert_eq!(config.ingest.write_attempts, 3);
    assert_eq!(config.storage.busy_timeout_ms, 5000);
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn unknown_field_is_rejected() {
    let toml = r#"
[ingest]
batch_sizes = 100
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Unknown sections are rejected too.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_catches_zero_batch_size() {
    let toml = r#"
[ingest]
batch_size = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| e.to_string().contains("batch_size")));
}

/// Type mismatches surface as load errors, not panics.
#[test]
fn type_mismatch_is_a_load_error() {
    let toml = r#"
[ingest]
batch_size = "lots"
"#;
    assert!(load_and_validate_str(toml).is_err());
}
