use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use docqa_core::traits::Embedder;
use docqa_core::Result;

/// Feature-hashing bag-of-words embedder.
///
/// Lower-cased alphanumeric tokens are hashed into `dim` signed buckets and the
/// result is L2-normalized. Deterministic and model-free, so it backs tests and
/// offline development; texts sharing words land close together.
#[derive(Debug, Clone)]
pub struct HashEmbedder { dim: usize }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn dim(&self) -> usize { self.dim }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in tokens(text) {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_case_and_punctuation_insensitive() {
        let t: Vec<String> = tokens("Cat, sat; ON the-mat!").collect();
        assert_eq!(t, vec!["cat", "sat", "on", "the", "mat"]);
        let e = HashEmbedder::new(64);
        assert_eq!(e.embed_text("Cat!"), e.embed_text("cat"));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let v = HashEmbedder::new(16).embed_text("  ...  ");
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
