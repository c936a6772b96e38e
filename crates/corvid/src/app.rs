// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations: agent assembly and the `ingest`, `ask`,
//! and `config` subcommands.

use std::sync::Arc;

use async_trait::async_trait;
use corvid_agent::Agent;
use corvid_config::{CorvidConfig, load_persona};
use corvid_core::{CorvidError, EmbeddingProvider, LanguageModel, SocialClient};
use corvid_openai::OpenAiClient;
use corvid_store::open_database;
use corvid_x::XClient;
use tracing::{debug, info, warn};

/// Stand-in social client used when `x.bearer_token` is not set.
/// Replies are still generated and printed, just never published.
struct DisabledPublisher;

#[async_trait]
impl SocialClient for DisabledPublisher {
    async fn post(&self, text: &str) -> Result<(), CorvidError> {
        debug!(chars = text.len(), "publishing disabled, post dropped");
        Ok(())
    }

    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>, CorvidError> {
        debug!(handle, "publishing disabled, handle not resolved");
        Ok(None)
    }

    async fn send_direct_message(&self, _recipient_id: &str, _text: &str) -> Result<(), CorvidError> {
        Ok(())
    }
}

/// Assembles the agent from configuration: persona, database, OpenAI
/// client, and the X client (or a disabled stand-in without a token).
async fn build_agent(config: &CorvidConfig) -> Result<Agent, CorvidError> {
    let persona = load_persona(&config.agent.persona_path);

    let api_key = config.openai.api_key.as_deref().ok_or_else(|| {
        CorvidError::Config(
            "openai.api_key is required (set it in corvid.toml or CORVID_OPENAI_API_KEY)"
                .to_string(),
        )
    })?;
    let openai = Arc::new(OpenAiClient::new(
        api_key,
        &config.openai.api_base,
        &config.openai.chat_model,
        &config.openai.embedding_model,
    )?);

    let social: Arc<dyn SocialClient> = match config.x.bearer_token.as_deref() {
        Some(token) => Arc::new(XClient::new(token)?),
        None => {
            warn!("x.bearer_token not set, publishing disabled");
            Arc::new(DisabledPublisher)
        }
    };

    let conn = open_database(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(
        database = config.storage.database_path.as_str(),
        persona = persona.display_name(),
        "agent assembled"
    );

    Agent::new(
        config,
        persona,
        conn,
        openai.clone() as Arc<dyn EmbeddingProvider>,
        openai as Arc<dyn LanguageModel>,
        social,
    )
    .await
}

/// `corvid ingest`: rebuild the knowledge table from the persona's
/// ingestion URLs.
pub async fn run_ingest(config: &CorvidConfig) -> Result<(), CorvidError> {
    let agent = build_agent(config).await?;
    let count = agent.ingest().await?;
    println!("ingested {count} knowledge chunks");
    Ok(())
}

/// `corvid ask`: run one query through the agent and print the reply.
pub async fn run_ask(
    config: &CorvidConfig,
    query: &str,
    to: Option<&str>,
) -> Result<(), CorvidError> {
    let mut agent = build_agent(config).await?;
    let response = agent.process_query(query, to).await;
    println!("{response}");
    Ok(())
}

/// `corvid config`: print the resolved configuration as TOML, with
/// credentials redacted.
pub fn run_config(config: &CorvidConfig) -> Result<(), CorvidError> {
    let mut shown = config.clone();
    if shown.openai.api_key.is_some() {
        shown.openai.api_key = Some("<redacted>".to_string());
    }
    if shown.x.bearer_token.is_some() {
        shown.x.bearer_token = Some("<redacted>".to_string());
    }
    let rendered = toml::to_string_pretty(&shown)
        .map_err(|e| CorvidError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}
