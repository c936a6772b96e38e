// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and splitter overlap bounds.

use crate::diagnostic::ConfigError;
use crate::model::CorvidConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CorvidConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.agent.persona_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.persona_path must not be empty".to_string(),
        });
    }

    if config.agent.max_history == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.max_history must be at least 1".to_string(),
        });
    }

    if config.openai.chat_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openai.chat_model must not be empty".to_string(),
        });
    }

    if config.openai.embedding_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openai.embedding_model must not be empty".to_string(),
        });
    }

    if config.x.character_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "x.character_limit must be at least 1".to_string(),
        });
    }

    if config.ingest.chunk_size == 0 {
        errors.push(ConfigError::Validation {
            message: "ingest.chunk_size must be at least 1".to_string(),
        });
    }

    if config.ingest.chunk_overlap >= config.ingest.chunk_size {
        errors.push(ConfigError::Validation {
            message: format!(
                "ingest.chunk_overlap ({}) must be smaller than ingest.chunk_size ({})",
                config.ingest.chunk_overlap, config.ingest.chunk_size
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
