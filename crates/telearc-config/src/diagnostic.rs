// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration errors rendered as miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic rendering.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ConfigError {
    /// TOML parsing or deserialization failed.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(telearc::config::load),
        help("check telearc.toml against the documented sections: [archive], [platform], [vault], [storage], [ingest]")
    )]
    Load {
        /// The underlying figment error message.
        message: String,
    },

    /// A deserialized value failed semantic validation.
    #[error("invalid configuration value: {message}")]
    #[diagnostic(code(telearc::config::validation))]
    Validation {
        /// Description of the constraint violation.
        message: String,
    },
}

/// Convert a figment error into one diagnostic per underlying failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Load {
            message: e.to_string(),
        })
        .collect()
}

/// Render all collected errors to stderr via miette.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }
}
