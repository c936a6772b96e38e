// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration for the Corvid agent.
//!
//! The [`Agent`] owns the persona, the knowledge table, the rolling
//! conversational memory, the rate limiter, and handles to the
//! external collaborators (embeddings, language model, social
//! client). One query is fully handled before the next begins:
//! retrieve context, compose the prompt, call the model, record the
//! exchange, then publish through the rate limiter.

pub mod composer;
pub mod dispatch;

use std::sync::Arc;

use corvid_config::{CorvidConfig, Persona};
use corvid_core::{
    ChatMessage, CorvidError, EmbeddingProvider, LanguageModel, ModelRequest, SocialClient,
};
use corvid_ingest::{DocumentFetcher, split_text};
use corvid_memory::ConversationMemory;
use corvid_store::{Chunk, VectorTable};
use tokio_rusqlite::Connection;
use tracing::{error, info, warn};

pub use composer::{NO_CONTEXT_FALLBACK, build_prompt, build_system_prompt, build_user_prompt};
pub use dispatch::{FormatOptions, RateLimiter, split_for_platform};

/// The character-driven conversational agent.
///
/// Exclusively owns its persona and rate state; all mutation of the
/// knowledge and memory tables goes through the owned handles.
/// `process_query` takes `&mut self`, so queries on one agent are
/// strictly sequential and publishes happen in submission order.
pub struct Agent {
    persona: Persona,
    knowledge: VectorTable,
    memory: ConversationMemory,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn LanguageModel>,
    social: Arc<dyn SocialClient>,
    fetcher: DocumentFetcher,
    rate_limiter: RateLimiter,
    context_chunks: usize,
    recent_turns: usize,
    chunk_size: usize,
    chunk_overlap: usize,
    character_limit: usize,
}

impl Agent {
    /// Assembles an agent over an open database connection and the
    /// given collaborators. Creates the knowledge and memory tables
    /// if absent.
    pub async fn new(
        config: &CorvidConfig,
        persona: Persona,
        conn: Connection,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn LanguageModel>,
        social: Arc<dyn SocialClient>,
    ) -> Result<Self, CorvidError> {
        let knowledge = VectorTable::open(conn.clone(), &config.agent.knowledge_table).await?;
        let memory = ConversationMemory::open(
            conn,
            &config.agent.memory_table,
            Arc::clone(&embedder),
            persona.display_name(),
            config.agent.max_history,
        )
        .await?;
        let rate_limiter =
            RateLimiter::from_rate_per_minute(persona.interaction_policies.rate_limit_per_minute);
        let fetcher = DocumentFetcher::new()?;

        Ok(Self {
            persona,
            knowledge,
            memory,
            embedder,
            model,
            social,
            fetcher,
            rate_limiter,
            context_chunks: config.agent.context_chunks,
            recent_turns: config.agent.recent_turns,
            chunk_size: config.ingest.chunk_size,
            chunk_overlap: config.ingest.chunk_overlap,
            character_limit: config.x.character_limit,
        })
    }

    /// The loaded persona profile.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Rebuilds the knowledge table from the persona's ingestion URLs.
    ///
    /// Fetches every URL, splits the extracted text into overlapping
    /// chunks, embeds them, then replaces the table contents in one
    /// pass. Unlike query processing, failures propagate: ingestion is
    /// an explicit operation and the operator should see them. Returns
    /// the number of chunks stored.
    pub async fn ingest(&self) -> Result<usize, CorvidError> {
        let urls = &self.persona.ingestion_urls;
        if urls.is_empty() {
            warn!("no ingestion urls configured, knowledge table left unchanged");
            return Ok(0);
        }

        let documents = self.fetcher.fetch_documents(urls).await?;
        let mut texts = Vec::new();
        let mut sources = Vec::new();
        for document in &documents {
            for piece in split_text(&document.text, self.chunk_size, self.chunk_overlap) {
                texts.push(piece);
                sources.push(document.source.clone());
            }
        }
        if texts.is_empty() {
            warn!("fetched documents contained no text, knowledge table left unchanged");
            return Ok(0);
        }

        let vectors = self.embedder.embed(&texts).await?;
        let chunks: Vec<Chunk> = texts
            .into_iter()
            .zip(sources)
            .zip(vectors)
            .map(|((text, source), vector)| Chunk {
                id: 0,
                text,
                source,
                vector,
            })
            .collect();
        let count = chunks.len();

        self.knowledge.clear().await?;
        self.knowledge.insert(chunks).await?;
        info!(documents = documents.len(), chunks = count, "knowledge ingested");
        Ok(count)
    }

    /// Joins the texts of up to `k` most similar chunks, newline
    /// separated. An empty result yields a fixed fallback sentence so
    /// the prompt always carries a knowledge block.
    pub async fn retrieve_context(&self, query: &str, k: usize) -> Result<String, CorvidError> {
        let mut vectors = self.embedder.embed(std::slice::from_ref(&query.to_string())).await?;
        let vector = vectors.pop().ok_or_else(|| CorvidError::Embedding {
            message: "embedding provider returned no vectors".into(),
            source: None,
        })?;
        let scored = self.knowledge.search(&vector, k).await?;
        if scored.is_empty() {
            return Ok(NO_CONTEXT_FALLBACK.to_string());
        }
        let joined = scored
            .iter()
            .map(|s| s.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(joined)
    }

    /// Handles one query end to end and returns the response text.
    ///
    /// Never fails: a model error substitutes the persona's fallback
    /// reply, and memory or publish failures are logged and swallowed
    /// so the caller always gets the generated text. With a recipient
    /// handle the reply goes out as a direct message; otherwise it is
    /// segmented and posted publicly.
    pub async fn process_query(&mut self, query: &str, recipient: Option<&str>) -> String {
        info!(query, "processing query");

        let knowledge = match self.retrieve_context(query, self.context_chunks).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "context retrieval failed");
                NO_CONTEXT_FALLBACK.to_string()
            }
        };
        let memory_text = match self.memory.recent(self.recent_turns).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "memory recall failed");
                String::new()
            }
        };

        let request = self.model_request(query, &memory_text, &knowledge);
        let response = match self.model.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "model call failed, using fallback response");
                self.persona.fallback_response().to_string()
            }
        };

        if let Err(e) = self.memory.add_interaction(query, &response).await {
            error!(error = %e, "failed to record interaction");
        }

        self.publish(&response, recipient).await;
        response
    }

    fn model_request(&self, query: &str, memory_text: &str, knowledge_text: &str) -> ModelRequest {
        let settings = &self.persona.llm_settings;
        ModelRequest {
            messages: vec![
                ChatMessage::system(build_system_prompt(&self.persona)),
                ChatMessage::user(build_user_prompt(
                    query,
                    &self.persona,
                    memory_text,
                    knowledge_text,
                )),
            ],
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
            frequency_penalty: settings.frequency_penalty,
            presence_penalty: settings.presence_penalty,
            stop: settings.stop_sequences.clone(),
        }
    }

    /// Routes the reply: direct message when a recipient handle
    /// resolves, public segmented posts otherwise. Publish failures
    /// are logged, not retried, and never fail the query.
    async fn publish(&mut self, text: &str, recipient: Option<&str>) {
        if let Some(handle) = recipient {
            match self.social.resolve_handle(handle).await {
                Ok(Some(id)) => {
                    self.rate_limiter.acquire().await;
                    let result = self.social.send_direct_message(&id, text).await;
                    self.rate_limiter.mark_published();
                    if let Err(e) = result {
                        error!(handle, error = %e, "direct message failed");
                    }
                }
                Ok(None) => {
                    warn!(handle, "recipient handle not found, skipping direct message");
                }
                Err(e) => {
                    error!(handle, error = %e, "handle resolution failed");
                }
            }
            return;
        }

        let options = FormatOptions::from_persona(&self.persona);
        for segment in split_for_platform(text, self.character_limit, &options) {
            self.rate_limiter.acquire().await;
            let result = self.social.post(&segment).await;
            self.rate_limiter.mark_published();
            if let Err(e) = result {
                error!(error = %e, "post failed, remaining segments dropped");
                break;
            }
        }
    }
}
