use std::path::{Path, PathBuf};

use tracing::{debug, info};

use docqa_core::chunker::Chunker;
use docqa_core::config::{RetrievalSettings, Settings};
use docqa_core::traits::Embedder;
use docqa_core::types::ScoredChunk;
use docqa_core::{Error, Result};
use docqa_extract::extract_text;
use docqa_vector::VectorIndex;

use crate::rerank;

/// Returned by `build_context` when the index yields nothing for a query.
pub const NO_INFORMATION: &str = "The document does not provide this information.";

/// One retrieval session: a vector index plus the policy used to fill it and
/// to turn its hits into a context window. Callers hold it explicitly; there
/// is no process-wide instance.
pub struct Retriever {
    index: VectorIndex,
    chunker: Chunker,
    retrieval: RetrievalSettings,
    index_dir: PathBuf,
}

impl Retriever {
    /// Create an empty session. Nothing is read from disk.
    pub fn new(embedder: Box<dyn Embedder>, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            index: VectorIndex::new(embedder).with_batch_size(settings.embedding.batch_size),
            chunker: Chunker::new(settings.chunking)?,
            retrieval: settings.retrieval.clone(),
            index_dir: settings.storage.index_path(),
        })
    }

    /// Create a session and restore the saved index if one exists.
    pub fn open(embedder: Box<dyn Embedder>, settings: &Settings) -> Result<Self> {
        let mut retriever = Self::new(embedder, settings)?;
        if !retriever.load()? {
            info!("no existing vector database found, ingest a document first");
        }
        Ok(retriever)
    }

    pub fn load(&mut self) -> Result<bool> { self.index.load(&self.index_dir) }

    pub fn index_dir(&self) -> &Path { &self.index_dir }

    pub fn retrieval(&self) -> &RetrievalSettings { &self.retrieval }

    pub fn is_ready(&self) -> bool { self.index.is_built() }

    pub fn len(&self) -> usize { self.index.len() }

    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    /// Chunk `raw_text`, rebuild the index from it and persist the result.
    /// Any previously ingested document is replaced. Returns the number of
    /// chunks stored.
    pub fn ingest(&mut self, raw_text: &str) -> Result<usize> {
        let chunks = self.chunker.chunk(raw_text);
        if chunks.is_empty() {
            return Err(Error::EmptyDocument);
        }
        info!(chunks = chunks.len(), "ingesting document");
        self.index.build(&chunks)?;
        self.index.save(&self.index_dir)?;
        Ok(self.index.len())
    }

    /// Extract a PDF or DOCX file and ingest its text.
    pub fn ingest_file(&mut self, path: &Path) -> Result<usize> {
        let text = extract_text(path)?;
        if text.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }
        info!(path = %path.display(), chars = text.len(), "extracted document text");
        self.ingest(&text)
    }

    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>> { self.index.search(query, top_k) }

    pub fn search_scored(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        self.index.search_scored(query, top_k)
    }

    pub fn rerank(&self, query: &str, chunks: &[String]) -> Vec<String> { rerank::rerank(query, chunks) }

    pub fn trim(&self, chunk: &str, max_chars: usize) -> String { rerank::trim(chunk, max_chars) }

    /// Retrieve `top_k` candidates, rerank them lexically and join the best
    /// `context_size`, each trimmed, with blank lines. `None` when nothing was
    /// retrieved.
    pub fn assemble_context(&self, query: &str, top_k: usize, context_size: usize) -> Result<Option<String>> {
        let retrieved = self.search(query, top_k)?;
        if retrieved.is_empty() {
            debug!(query, "no chunks retrieved");
            return Ok(None);
        }
        let selected: Vec<String> = self
            .rerank(query, &retrieved)
            .iter()
            .take(context_size)
            .map(|chunk| self.trim(chunk, self.retrieval.max_chars))
            .collect();
        debug!(query, retrieved = retrieved.len(), selected = selected.len(), "context assembled");
        Ok(Some(selected.join("\n\n")))
    }

    /// Like `assemble_context`, with [`NO_INFORMATION`] standing in for an
    /// empty result.
    pub fn build_context(&self, query: &str, top_k: usize, context_size: usize) -> Result<String> {
        Ok(self
            .assemble_context(query, top_k, context_size)?
            .unwrap_or_else(|| NO_INFORMATION.to_string()))
    }

    /// `build_context` with the configured `top_k` and `context_size`.
    pub fn context(&self, query: &str) -> Result<String> {
        self.build_context(query, self.retrieval.top_k, self.retrieval.context_size)
    }
}
