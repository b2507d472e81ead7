use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use docqa_core::traits::Embedder;
use docqa_core::types::ScoredChunk;
use docqa_core::{Error, Result};

use crate::math::{l2_normalize, top_k_inner_product};
use crate::store::{artifacts_exist, read_pair, write_pair};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Built state: `vectors[i]` is the unit-length embedding of `chunks[i]`.
#[derive(Debug, Clone)]
struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
    chunks: Vec<String>,
}

/// Exact cosine-similarity index over chunk texts.
///
/// The index is either absent or fully built. `build` and `load` replace the
/// whole state at once; there is no incremental append.
pub struct VectorIndex {
    embedder: Box<dyn Embedder>,
    batch_size: usize,
    state: Option<FlatIndex>,
}

impl VectorIndex {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder, batch_size: DEFAULT_BATCH_SIZE, state: None }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn is_built(&self) -> bool { self.state.is_some() }

    pub fn len(&self) -> usize { self.state.as_ref().map_or(0, |s| s.chunks.len()) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn dim(&self) -> Option<usize> { self.state.as_ref().map(|s| s.dim) }

    /// Stored chunk texts in insertion order; empty when not built.
    pub fn chunks(&self) -> &[String] { self.state.as_ref().map(|s| s.chunks.as_slice()).unwrap_or_default() }

    /// Embed the distinct `chunks` (first occurrence wins) and replace the
    /// current index with them.
    pub fn build(&mut self, chunks: &[String]) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique: Vec<String> = Vec::new();
        for c in chunks {
            if seen.insert(c.as_str()) { unique.push(c.clone()); }
        }
        if unique.is_empty() {
            return Err(Error::EmptyInput);
        }
        info!(chunks = unique.len(), dropped = chunks.len() - unique.len(), "embedding chunks");

        let (dim, vectors) = self.embed_all(&unique)?;
        self.state = Some(FlatIndex { dim, vectors, chunks: unique });
        info!(chunks = self.len(), dim, "vector index built");
        Ok(())
    }

    fn embed_all(&self, texts: &[String]) -> Result<(usize, Vec<Vec<f32>>)> {
        let pb = ProgressBar::new(texts.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);

        let mut dim = None;
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let embedded = self.embedder.embed_batch(batch)?;
            if embedded.len() != batch.len() {
                pb.abandon();
                return Err(Error::Embedding(format!("expected {} vectors, got {}", batch.len(), embedded.len())));
            }
            for mut v in embedded {
                let expected = *dim.get_or_insert(v.len());
                if v.len() != expected || expected == 0 {
                    pb.abandon();
                    return Err(Error::Embedding(format!("inconsistent embedding dimension: {} vs {}", v.len(), expected)));
                }
                l2_normalize(&mut v);
                vectors.push(v);
            }
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        Ok((dim.unwrap_or(0), vectors))
    }

    /// Write the index and its chunk list under `folder`, creating it if needed.
    pub fn save(&self, folder: &Path) -> Result<()> {
        let state = self.state.as_ref().ok_or(Error::NotBuilt)?;
        write_pair(folder, state.dim, &state.vectors, &state.chunks)?;
        info!(path = %folder.display(), chunks = state.chunks.len(), "vector DB saved");
        Ok(())
    }

    /// Restore a saved index. Returns `Ok(false)` and leaves the current state
    /// untouched when either artifact is missing.
    pub fn load(&mut self, folder: &Path) -> Result<bool> {
        if !artifacts_exist(folder) {
            warn!(path = %folder.display(), "vector DB not found");
            return Ok(false);
        }
        let (artifact, chunks) = read_pair(folder)?;
        self.state = Some(FlatIndex { dim: artifact.dim, vectors: artifact.vectors, chunks });
        info!(path = %folder.display(), chunks = self.len(), "vector DB loaded");
        Ok(true)
    }

    /// Top `top_k` chunks by cosine similarity to `query`, with scores.
    pub fn search_scored(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        let Some(state) = self.state.as_ref() else { return Ok(Vec::new()) };
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let mut q = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no vector returned for query".to_string()))?;
        if q.len() != state.dim {
            return Err(Error::Embedding(format!("query dimension {} does not match index dimension {}", q.len(), state.dim)));
        }
        l2_normalize(&mut q);

        let hits: Vec<ScoredChunk> = top_k_inner_product(&state.vectors, &q, top_k)
            .into_iter()
            .filter_map(|hit| {
                state.chunks.get(hit.idx).map(|text| ScoredChunk { text: text.clone(), score: hit.score, ordinal: hit.idx })
            })
            .collect();
        debug!(query, hits = hits.len(), "vector search");
        Ok(hits)
    }

    /// Top `top_k` chunk texts by cosine similarity; empty when not built.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        Ok(self.search_scored(query, top_k)?.into_iter().map(|h| h.text).collect())
    }
}
