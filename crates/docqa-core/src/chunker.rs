use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_OVERLAP: usize = 50;

/// Word-window parameters. `overlap` words are repeated between consecutive
/// windows, so it must stay below `chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_OVERLAP }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { chunk_size, overlap };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be greater than zero".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn stride(&self) -> usize { self.chunk_size - self.overlap }
}

#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig { self.config }

    /// Split `text` into overlapping word windows, dropping empty windows and
    /// exact repeats of an earlier window.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let stride = self.config.stride();
        let mut seen: HashSet<String> = HashSet::new();
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = start.saturating_add(self.config.chunk_size).min(words.len());
            let chunk = words[start..end].join(" ").trim().to_string();
            if !chunk.is_empty() && seen.insert(chunk.clone()) {
                chunks.push(chunk);
            }
            start = start.saturating_add(stride);
        }
        chunks
    }
}

/// Convenience wrapper over [`Chunker`] for one-off calls.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(Chunker::new(ChunkingConfig::new(chunk_size, overlap)?)?.chunk(text))
}
