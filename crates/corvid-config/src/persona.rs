// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona profile model and loader.
//!
//! The persona is a structured character profile loaded once at startup
//! and treated as read-only for the process lifetime. A missing or
//! malformed persona file degrades to an empty default profile with a
//! logged error rather than aborting startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Fallback reply used when the language model call fails and the
/// persona configures no `fallback_responses`.
pub const DEFAULT_FALLBACK_RESPONSE: &str =
    "I'm sorry, but I couldn't process your request at the moment.";

/// A character profile governing tone, allowed topics, and response
/// formatting. Every field is optional in the source file; absent
/// fields stay at their defaults and are omitted from prompts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub description: String,
    pub history: String,
    pub background: String,
    pub life_story: String,
    pub anecdotes: Vec<String>,

    /// Trait name -> enabled flag. Only traits flagged true are
    /// rendered; BTreeMap keeps rendering order deterministic.
    pub personality_traits: BTreeMap<String, bool>,

    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    pub prohibited_topics: Vec<String>,
    pub communication_style: String,
    pub tone: String,

    pub response_format: ResponseFormat,

    /// Topics rendered as hashtags when `include_hashtags` is set.
    pub preferred_topics: Vec<String>,

    pub interaction_policies: InteractionPolicies,

    /// URLs whose content is ingested into the knowledge table.
    pub ingestion_urls: Vec<String>,

    pub additional_instructions: String,

    pub llm_settings: LlmSettings,
}

impl Persona {
    /// Display name, falling back to a neutral default when unset.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { "Corvid" } else { &self.name }
    }

    /// The reply substituted when the model call fails.
    pub fn fallback_response(&self) -> &str {
        self.llm_settings
            .fallback_responses
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_FALLBACK_RESPONSE)
    }
}

/// Reply decoration flags.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseFormat {
    pub use_emojis: bool,
    pub include_hashtags: bool,
    pub include_mentions: bool,
}

/// Outbound interaction policies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionPolicies {
    /// Maximum publishes per minute; zero or negative means unlimited.
    pub rate_limit_per_minute: f64,
    /// Named retry strategy. Recorded and logged; the retry policy
    /// itself is external to this core.
    pub error_handling_strategy: String,
}

impl Default for InteractionPolicies {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 60.0,
            error_handling_strategy: "none".to_string(),
        }
    }
}

/// Sampling parameters and fallbacks for the language model call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmSettings {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub stop_sequences: Vec<String>,
    /// Replies substituted when the model call fails; first entry wins.
    pub fallback_responses: Vec<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            frequency_penalty: 0.0,
            presence_penalty: 0.6,
            stop_sequences: Vec::new(),
            fallback_responses: Vec::new(),
        }
    }
}

/// Loads the persona profile from a JSON file.
///
/// Loading failure degrades to `Persona::default()` with a logged
/// error; a misconfigured persona file never prevents the agent from
/// starting.
pub fn load_persona(path: impl AsRef<Path>) -> Persona {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Persona>(&content) {
            Ok(persona) => {
                info!(path = %path.display(), name = persona.display_name(), "persona loaded");
                persona
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "persona file is not valid JSON, using empty persona");
                Persona::default()
            }
        },
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read persona file, using empty persona");
            Persona::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_fills_defaults() {
        let persona: Persona = serde_json::from_str(
            r#"{"name": "Alexandra", "tone": "warm", "likes": ["astronomy"]}"#,
        )
        .unwrap();
        assert_eq!(persona.name, "Alexandra");
        assert_eq!(persona.tone, "warm");
        assert_eq!(persona.likes, vec!["astronomy"]);
        assert!(persona.history.is_empty());
        assert!(persona.anecdotes.is_empty());
        assert_eq!(persona.interaction_policies.rate_limit_per_minute, 60.0);
        assert_eq!(persona.llm_settings.max_tokens, 512);
    }

    #[test]
    fn display_name_defaults_when_empty() {
        let persona = Persona::default();
        assert_eq!(persona.display_name(), "Corvid");
    }

    #[test]
    fn fallback_prefers_configured_response() {
        let mut persona = Persona::default();
        assert_eq!(persona.fallback_response(), DEFAULT_FALLBACK_RESPONSE);

        persona.llm_settings.fallback_responses =
            vec!["Ask me later.".to_string(), "unused".to_string()];
        assert_eq!(persona.fallback_response(), "Ask me later.");
    }

    #[test]
    fn personality_traits_deserialize_as_flags() {
        let persona: Persona = serde_json::from_str(
            r#"{"personality_traits": {"curious": true, "sarcastic": false}}"#,
        )
        .unwrap();
        assert_eq!(persona.personality_traits.get("curious"), Some(&true));
        assert_eq!(persona.personality_traits.get("sarcastic"), Some(&false));
    }

    #[test]
    fn missing_file_degrades_to_default() {
        let persona = load_persona("/nonexistent/persona.json");
        assert!(persona.name.is_empty());
        assert!(persona.ingestion_urls.is_empty());
    }

    #[test]
    fn malformed_file_degrades_to_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let persona = load_persona(file.path());
        assert!(persona.name.is_empty());
    }

    #[test]
    fn full_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            serde_json::json!({
                "name": "Alexandra",
                "description": "A thoughtful science communicator",
                "response_format": {"use_emojis": true, "include_hashtags": true},
                "interaction_policies": {"rate_limit_per_minute": 6.0},
                "ingestion_urls": ["https://example.com/a"],
                "llm_settings": {"fallback_responses": ["Later!"]}
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        let persona = load_persona(file.path());
        assert_eq!(persona.name, "Alexandra");
        assert!(persona.response_format.use_emojis);
        assert!(persona.response_format.include_hashtags);
        assert!(!persona.response_format.include_mentions);
        assert_eq!(persona.interaction_policies.rate_limit_per_minute, 6.0);
        assert_eq!(persona.fallback_response(), "Later!");
    }
}
