// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Corvid configuration system.

use corvid_config::diagnostic::{ConfigError, suggest_key};
use corvid_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_corvid_config() {
    let toml = r#"
[agent]
log_level = "debug"
persona_path = "alexandra.json"
knowledge_table = "alexandra_knowledge"
max_history = 20
context_chunks = 4
recent_turns = 3

[storage]
database_path = "/tmp/corvid-test.db"
wal_mode = false

[openai]
api_key = "sk-123"
chat_model = "gpt-4o-mini"
embedding_model = "text-embedding-3-small"

[x]
bearer_token = "AAAA"
character_limit = 280

[ingest]
chunk_size = 400
chunk_overlap = 40
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.persona_path, "alexandra.json");
    assert_eq!(config.agent.knowledge_table, "alexandra_knowledge");
    assert_eq!(config.agent.max_history, 20);
    assert_eq!(config.agent.context_chunks, 4);
    assert_eq!(config.agent.recent_turns, 3);
    assert_eq!(config.storage.database_path, "/tmp/corvid-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-123"));
    assert_eq!(config.openai.chat_model, "gpt-4o-mini");
    assert_eq!(config.x.bearer_token.as_deref(), Some("AAAA"));
    assert_eq!(config.ingest.chunk_size, 400);
    assert_eq!(config.ingest.chunk_overlap, 40);
}

/// Unknown field in [agent] section is rejected.
#[test]
fn unknown_field_in_agent_produces_error() {
    let toml = r#"
[agent]
persona_pth = "p.json"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("persona_pth"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[agent]\nlog_level = \"warn\"\n").unwrap();
    assert_eq!(config.agent.log_level, "warn");
    assert_eq!(config.openai.chat_model, "gpt-4o");
    assert_eq!(config.x.character_limit, 280);
}

/// load_and_validate_str surfaces semantic validation failures.
#[test]
fn semantic_validation_failures_are_collected() {
    let toml = r#"
[agent]
max_history = 0

[ingest]
chunk_size = 50
chunk_overlap = 60
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Typo suggestions come from Jaro-Winkler similarity.
#[test]
fn typo_suggestion_for_config_key() {
    let valid = &["bearer_token", "character_limit"];
    assert_eq!(
        suggest_key("bearer_tokn", valid),
        Some("bearer_token".to_string())
    );
}

/// A typo'd key yields an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_diagnostic_carries_suggestion() {
    let errors =
        load_and_validate_str("[storage]\ndatabse_path = \"/tmp/x.db\"\n").expect_err("bad key");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "database_path"
    )));
}
