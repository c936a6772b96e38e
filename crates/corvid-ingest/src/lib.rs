// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge ingestion for the Corvid agent: fetch source URLs,
//! extract plain text, and split it into fixed-size overlapping chunks
//! ready for embedding.

pub mod fetch;
pub mod text;

pub use fetch::DocumentFetcher;
pub use text::{split_text, strip_html};
