//! Lexical confirmation pass over vector-search candidates.

use std::collections::HashSet;

use docqa_core::types::RankedChunk;

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Score each chunk by how many distinct lower-cased query words it contains.
/// Sorted by descending overlap; equal overlaps keep their input order.
pub fn rank_by_overlap(query: &str, chunks: &[String]) -> Vec<RankedChunk> {
    let query_words = word_set(query);
    let mut ranked: Vec<RankedChunk> = chunks
        .iter()
        .map(|chunk| {
            let overlap = word_set(chunk).intersection(&query_words).count();
            RankedChunk { text: chunk.clone(), overlap }
        })
        .collect();
    ranked.sort_by(|a, b| b.overlap.cmp(&a.overlap));
    ranked
}

pub fn rerank(query: &str, chunks: &[String]) -> Vec<String> {
    rank_by_overlap(query, chunks).into_iter().map(|r| r.text).collect()
}

/// First `max_chars` characters of `chunk`, whitespace-trimmed. Not word
/// aware: the cut may land inside a word.
pub fn trim(chunk: &str, max_chars: usize) -> String {
    chunk.chars().take(max_chars).collect::<String>().trim().to_string()
}
