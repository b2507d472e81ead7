//! docqa-embed
//!
//! Embedding providers for docqa: a local BGE-M3 model run with candle and a
//! deterministic hashing embedder for tests and offline use.

mod bge;
pub mod device;
mod hash;
pub mod pool;
pub mod tokenize;

pub use bge::{BgeM3Embedder, BGE_M3_MAX_LEN};
pub use hash::HashEmbedder;
pub use pool::masked_mean_l2;

use docqa_core::config::{expand_path, EmbeddingBackend, EmbeddingSettings};
use docqa_core::traits::Embedder;
use docqa_core::{Error, Result};
use tracing::info;

/// `APP_USE_FAKE_EMBEDDINGS=1` (or `true`) forces the hashing embedder.
pub fn fake_embeddings_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn embedder_from_settings(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    let backend = if fake_embeddings_requested() { EmbeddingBackend::Hash } else { settings.backend };
    match backend {
        EmbeddingBackend::Hash => {
            info!(dim = settings.dim, "using hashing embedder");
            Ok(Box::new(HashEmbedder::new(settings.dim)))
        }
        EmbeddingBackend::BgeM3 => {
            let model_dir = settings.model_dir.as_ref().map(expand_path);
            let model = BgeM3Embedder::new(model_dir.as_deref()).map_err(|e| Error::Embedding(format!("{e:#}")))?;
            Ok(Box::new(model))
        }
    }
}
