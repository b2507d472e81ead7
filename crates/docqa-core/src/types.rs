//! Domain types shared by the index and the retriever.

use serde::{Deserialize, Serialize};

/// A stored chunk together with its similarity to a query.
///
/// - `text`: the chunk payload as it was indexed
/// - `score`: cosine similarity to the query, higher is better
/// - `ordinal`: insertion position inside the index; earlier wins on ties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
    pub ordinal: usize,
}

/// A candidate chunk with its lexical overlap against the query words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedChunk {
    pub text: String,
    pub overlap: usize,
}
