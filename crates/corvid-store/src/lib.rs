// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed vector storage for the Corvid agent.
//!
//! Provides a thin contract over named similarity-searchable tables:
//! create-or-open, bulk insert with vectors, delete-all, and top-k
//! search by ascending cosine distance. Vectors are stored as
//! little-endian f32 BLOBs.

pub mod codec;
pub mod table;

pub use codec::{blob_to_vec, cosine_distance, cosine_similarity, vec_to_blob};
pub use table::{Chunk, ScoredChunk, VectorTable};

use corvid_core::CorvidError;
use table::storage_err;
use tokio_rusqlite::Connection;

/// Opens (or creates) the shared SQLite database at `path`, applying
/// WAL mode when requested.
pub async fn open_database(path: &str, wal_mode: bool) -> Result<Connection, CorvidError> {
    if let Some(parent) = std::path::Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| CorvidError::Storage {
            source: Box::new(e),
        })?;
    }

    let conn = Connection::open(path)
        .await
        .map_err(|e| storage_err(e.into()))?;

    if wal_mode {
        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;
    }

    Ok(conn)
}
