// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded conversational memory for the Corvid agent.
//!
//! Every completed (query, response) exchange is stored with an
//! embedding of the joined turn and an ISO 8601 timestamp. The table
//! is append-only with oldest-first eviction once it exceeds
//! `max_history`. Recency retrieval is a straight timestamp query and
//! deliberately independent of the similarity axis.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use corvid_core::{CorvidError, EmbeddingProvider};
use corvid_store::{blob_to_vec, vec_to_blob};
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

/// Helper to convert tokio_rusqlite errors into CorvidError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> CorvidError {
    CorvidError::Storage {
        source: Box::new(e),
    }
}

/// One recorded (query, response) exchange.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// UUID assigned at creation.
    pub id: String,
    /// ISO 8601 creation timestamp.
    pub timestamp: String,
    pub query: String,
    pub response: String,
    /// Embedding of the joined turn, for similarity retrieval.
    pub vector: Vec<f32>,
}

/// Persistent rolling memory of past exchanges.
///
/// Owns the interaction table exclusively; all mutation goes through
/// these methods. The retained row count never exceeds `max_history`
/// after an `add_interaction` call.
pub struct ConversationMemory {
    conn: Connection,
    table: String,
    embedder: Arc<dyn EmbeddingProvider>,
    persona_name: String,
    max_history: usize,
}

impl ConversationMemory {
    /// Opens the memory table, creating it if absent.
    pub async fn open(
        conn: Connection,
        table: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        persona_name: impl Into<String>,
        max_history: usize,
    ) -> Result<Self, CorvidError> {
        validate_table_name(table)?;
        let create = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY NOT NULL,
                timestamp TEXT NOT NULL,
                user_query TEXT NOT NULL,
                response TEXT NOT NULL,
                embedding BLOB NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_timestamp ON {table}(timestamp);"
        );
        conn.call(move |conn| {
            conn.execute_batch(&create)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        Ok(Self {
            conn,
            table: table.to_string(),
            embedder,
            persona_name: persona_name.into(),
            max_history,
        })
    }

    /// Records an exchange: embeds the joined turn, stores the
    /// interaction, then prunes. Returns the new interaction's id.
    pub async fn add_interaction(
        &self,
        query: &str,
        response: &str,
    ) -> Result<String, CorvidError> {
        let combined = format!("User: {query}\n{}: {response}", self.persona_name);
        let mut vectors = self.embedder.embed(std::slice::from_ref(&combined)).await?;
        let vector = vectors.pop().ok_or_else(|| {
            CorvidError::Embedding {
                message: "embedding provider returned no vectors".into(),
                source: None,
            }
        })?;

        let id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let sql = format!(
            "INSERT INTO {} (id, timestamp, user_query, response, embedding) VALUES (?1, ?2, ?3, ?4, ?5)",
            self.table
        );
        let row_id = id.clone();
        let row_query = query.to_string();
        let row_response = response.to_string();
        let blob = vec_to_blob(&vector);
        self.conn
            .call(move |conn| {
                conn.execute(
                    &sql,
                    rusqlite::params![row_id, timestamp, row_query, row_response, blob],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        debug!(id = id.as_str(), "interaction recorded");
        self.prune().await?;
        Ok(id)
    }

    /// Evicts the oldest rows beyond `max_history`.
    ///
    /// Deletes exactly `count - max_history` rows ordered by timestamp
    /// then rowid (insertion order breaks timestamp ties). Idempotent:
    /// within budget it is a no-op.
    pub async fn prune(&self) -> Result<(), CorvidError> {
        let count = self.count().await?;
        if count <= self.max_history {
            return Ok(());
        }
        let excess = count - self.max_history;
        let sql = format!(
            "DELETE FROM {t} WHERE rowid IN (
                SELECT rowid FROM {t} ORDER BY timestamp, rowid LIMIT ?1
            )",
            t = self.table
        );
        let removed = self
            .conn
            .call(move |conn| {
                let n = conn.execute(&sql, rusqlite::params![excess as i64])?;
                Ok(n)
            })
            .await
            .map_err(storage_err)?;
        debug!(removed, "memory pruned");
        Ok(())
    }

    /// Returns the `top_k` most recent interactions formatted as turns
    /// in chronological (oldest-first) order. Empty memory, or
    /// `top_k == 0`, yields an empty string.
    pub async fn recent(&self, top_k: usize) -> Result<String, CorvidError> {
        let interactions = self.recent_interactions(top_k).await?;
        let turns: Vec<String> = interactions
            .iter()
            .map(|i| format!("User: {}\n{}: {}", i.query, self.persona_name, i.response))
            .collect();
        Ok(turns.join("\n"))
    }

    /// Like [`recent`](Self::recent) but returns structured rows,
    /// oldest first.
    pub async fn recent_interactions(
        &self,
        top_k: usize,
    ) -> Result<Vec<Interaction>, CorvidError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, timestamp, user_query, response, embedding FROM {}
             ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
            self.table
        );
        let mut rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params![top_k as i64], |row| {
                        let blob: Vec<u8> = row.get(4)?;
                        Ok(Interaction {
                            id: row.get(0)?,
                            timestamp: row.get(1)?,
                            query: row.get(2)?,
                            response: row.get(3)?,
                            vector: blob_to_vec(&blob),
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(storage_err)?;

        // Query returns newest first; flip to chronological order.
        rows.reverse();
        Ok(rows)
    }

    /// Number of retained interactions.
    pub async fn count(&self) -> Result<usize, CorvidError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        self.conn
            .call(move |conn| {
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(storage_err)
    }
}

/// Rejects table names that are not plain SQL identifiers.
fn validate_table_name(name: &str) -> Result<(), CorvidError> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CorvidError::Config(format!(
            "invalid table name `{name}`: must be a plain identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic fixed-dimension embedder for tests.
    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CorvidError> {
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, 1.0, 0.0])
                .collect())
        }
    }

    async fn test_memory(max_history: usize) -> ConversationMemory {
        let conn = Connection::open_in_memory().await.unwrap();
        ConversationMemory::open(conn, "memory_t", Arc::new(FixedEmbedder), "Alexandra", max_history)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn add_interaction_stores_row() {
        let memory = test_memory(10).await;
        let id = memory.add_interaction("hi", "hello there").await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(memory.count().await.unwrap(), 1);

        let rows = memory.recent_interactions(5).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].query, "hi");
        assert_eq!(rows[0].response, "hello there");
        assert_eq!(rows[0].vector.len(), 3);
    }

    #[tokio::test]
    async fn count_never_exceeds_max_history() {
        let memory = test_memory(3).await;
        for i in 0..8 {
            memory
                .add_interaction(&format!("q{i}"), &format!("r{i}"))
                .await
                .unwrap();
        }
        assert_eq!(memory.count().await.unwrap(), 3);

        // Retained rows are the most recent ones.
        let rows = memory.recent_interactions(3).await.unwrap();
        let queries: Vec<&str> = rows.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["q5", "q6", "q7"]);
    }

    #[tokio::test]
    async fn prune_is_idempotent_within_budget() {
        let memory = test_memory(5).await;
        memory.add_interaction("q0", "r0").await.unwrap();
        memory.add_interaction("q1", "r1").await.unwrap();

        memory.prune().await.unwrap();
        memory.prune().await.unwrap();
        assert_eq!(memory.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn recent_is_chronological() {
        let memory = test_memory(10).await;
        memory.add_interaction("first", "a").await.unwrap();
        memory.add_interaction("second", "b").await.unwrap();
        memory.add_interaction("third", "c").await.unwrap();

        let text = memory.recent(2).await.unwrap();
        // Only the two most recent, oldest of those first.
        assert_eq!(
            text,
            "User: second\nAlexandra: b\nUser: third\nAlexandra: c"
        );
    }

    #[tokio::test]
    async fn recent_zero_is_empty() {
        let memory = test_memory(10).await;
        memory.add_interaction("q", "r").await.unwrap();
        assert_eq!(memory.recent(0).await.unwrap(), "");
    }

    #[tokio::test]
    async fn recent_on_empty_memory_is_empty() {
        let memory = test_memory(10).await;
        assert_eq!(memory.recent(5).await.unwrap(), "");
        assert!(memory.recent_interactions(5).await.unwrap().is_empty());
    }
}
