// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named vector table over SQLite: create-or-open, bulk insert with
//! embeddings, wholesale clear, and brute-force top-k cosine search.
//!
//! Rows and their vectors travel together, so row/vector correspondence
//! is preserved by construction. The "index structure" is a linear scan
//! ranked in process, which is the right shape for a few thousand
//! knowledge chunks.

use corvid_core::CorvidError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::codec::{blob_to_vec, cosine_distance, vec_to_blob};

/// Helper to convert tokio_rusqlite errors into CorvidError::Storage.
pub(crate) fn storage_err(e: tokio_rusqlite::Error) -> CorvidError {
    CorvidError::Storage {
        source: Box::new(e),
    }
}

/// A knowledge chunk: a slice of ingested source text with its
/// originating URL and embedding vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Row id; assigned by the store on insert.
    pub id: i64,
    pub text: String,
    pub source: String,
    pub vector: Vec<f32>,
}

/// A chunk returned from similarity search, with its cosine distance
/// from the query vector (lower is closer).
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Handle to a named vector table in the shared SQLite database.
#[derive(Clone)]
pub struct VectorTable {
    conn: Connection,
    name: String,
}

impl VectorTable {
    /// Opens the named table, creating it if absent.
    ///
    /// The name must be a plain identifier since it is interpolated
    /// into SQL; anything else is rejected as a config error.
    pub async fn open(conn: Connection, name: &str) -> Result<Self, CorvidError> {
        validate_table_name(name)?;
        let create = format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                source TEXT NOT NULL,
                embedding BLOB NOT NULL
            )"
        );
        conn.call(move |conn| {
            conn.execute_batch(&create)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        debug!(table = name, "vector table opened");
        Ok(Self {
            conn,
            name: name.to_string(),
        })
    }

    /// Table name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deletes all rows. Used before re-ingestion.
    pub async fn clear(&self) -> Result<(), CorvidError> {
        let sql = format!("DELETE FROM {}", self.name);
        self.conn
            .call(move |conn| {
                conn.execute(&sql, [])?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Bulk-inserts chunks with their vectors, in order, inside one
    /// transaction. The `id` field of the input is ignored; the store
    /// assigns row ids.
    pub async fn insert(&self, chunks: Vec<Chunk>) -> Result<(), CorvidError> {
        if chunks.is_empty() {
            return Ok(());
        }
        let sql = format!(
            "INSERT INTO {} (text, source, embedding) VALUES (?1, ?2, ?3)",
            self.name
        );
        let count = chunks.len();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(&sql)?;
                    for chunk in &chunks {
                        stmt.execute(rusqlite::params![
                            chunk.text,
                            chunk.source,
                            vec_to_blob(&chunk.vector),
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        debug!(table = self.name.as_str(), count, "chunks inserted");
        Ok(())
    }

    /// Top-k similarity search: scans all rows, ranks by ascending
    /// cosine distance from the query vector.
    ///
    /// An empty table yields an empty result, never an error.
    pub async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, CorvidError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT id, text, source, embedding FROM {}", self.name);
        let query = query_vector.to_vec();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let mut scored = stmt
                    .query_map([], |row| {
                        let blob: Vec<u8> = row.get(3)?;
                        let vector = blob_to_vec(&blob);
                        Ok(Chunk {
                            id: row.get(0)?,
                            text: row.get(1)?,
                            source: row.get(2)?,
                            vector,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .map(|chunk| {
                        let distance = cosine_distance(&query, &chunk.vector);
                        ScoredChunk { chunk, distance }
                    })
                    .collect::<Vec<_>>();

                scored.sort_by(|a, b| {
                    a.distance
                        .partial_cmp(&b.distance)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scored.truncate(k);
                Ok(scored)
            })
            .await
            .map_err(storage_err)
    }

    /// Number of stored rows.
    pub async fn count(&self) -> Result<usize, CorvidError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.name);
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
