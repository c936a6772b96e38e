// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Corvid agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Corvid configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorvidConfig {
    /// Agent behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// OpenAI API settings (chat completions and embeddings).
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// X platform settings.
    #[serde(default)]
    pub x: XConfig,

    /// Knowledge ingestion settings.
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Agent behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Path to the persona JSON file.
    #[serde(default = "default_persona_path")]
    pub persona_path: String,

    /// Name of the knowledge table populated by ingestion.
    #[serde(default = "default_knowledge_table")]
    pub knowledge_table: String,

    /// Name of the conversational memory table.
    #[serde(default = "default_memory_table")]
    pub memory_table: String,

    /// Maximum retained (query, response) interactions.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Knowledge chunks retrieved per query.
    #[serde(default = "default_context_chunks")]
    pub context_chunks: usize,

    /// Recent memory turns injected per query.
    #[serde(default = "default_recent_turns")]
    pub recent_turns: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            persona_path: default_persona_path(),
            knowledge_table: default_knowledge_table(),
            memory_table: default_memory_table(),
            max_history: default_max_history(),
            context_chunks: default_context_chunks(),
            recent_turns: default_recent_turns(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_persona_path() -> String {
    "persona.json".to_string()
}

fn default_knowledge_table() -> String {
    "corvid_knowledge".to_string()
}

fn default_memory_table() -> String {
    "conversation_memory".to_string()
}

fn default_max_history() -> usize {
    50
}

fn default_context_chunks() -> usize {
    3
}

fn default_recent_turns() -> usize {
    5
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("corvid").join("corvid.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "corvid.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completion model identifier.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API base URL, overridable for compatible endpoints.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            api_base: default_api_base(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

/// X platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct XConfig {
    /// X API bearer token. `None` disables publishing.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Per-post character limit.
    #[serde(default = "default_character_limit")]
    pub character_limit: usize,
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            character_limit: default_character_limit(),
        }
    }
}

fn default_character_limit() -> usize {
    280
}

/// Knowledge ingestion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks, in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CorvidConfig::default();
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.agent.knowledge_table, "corvid_knowledge");
        assert_eq!(config.agent.memory_table, "conversation_memory");
        assert_eq!(config.agent.max_history, 50);
        assert_eq!(config.agent.context_chunks, 3);
        assert_eq!(config.agent.recent_turns, 5);
        assert!(config.storage.wal_mode);
        assert_eq!(config.openai.chat_model, "gpt-4o");
        assert_eq!(config.x.character_limit, 280);
        assert_eq!(config.ingest.chunk_size, 500);
        assert_eq!(config.ingest.chunk_overlap, 50);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = CorvidConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CorvidConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.agent.max_history, config.agent.max_history);
        assert_eq!(parsed.openai.api_base, config.openai.api_base);
    }
}
