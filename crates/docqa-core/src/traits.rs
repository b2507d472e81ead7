use crate::error::Result;

/// Maps a batch of texts to fixed-dimension vectors.
///
/// Every call against the same instance must return vectors of one
/// dimensionality, one per input and in input order. Callers discover the
/// dimension from the output; vectors need not be normalized.
pub trait Embedder: Send + Sync {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Turns a prompt into a response. Failures surface as `Error::Generation`.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { (**self).embed_batch(texts) }
}

impl<T: Generator + ?Sized> Generator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String> { (**self).generate(prompt) }
}
