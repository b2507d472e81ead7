use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docqa_core::traits::Embedder;
use docqa_core::{Error, Result};
use docqa_embed::HashEmbedder;
use docqa_vector::math::{dot, l2_normalize};
use docqa_vector::{VectorIndex, CHUNKS_FILE, INDEX_FILE};
use tempfile::TempDir;

/// One dimension per vocabulary word, counting occurrences.
struct KeywordEmbedder { vocab: Vec<&'static str>, calls: Arc<AtomicUsize>, texts: Arc<AtomicUsize> }

impl KeywordEmbedder {
    fn new(vocab: &[&'static str]) -> Self {
        Self { vocab: vocab.to_vec(), calls: Arc::default(), texts: Arc::default() }
    }
}

impl Embedder for KeywordEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                self.vocab.iter().map(|w| lower.split_whitespace().filter(|x| x == w).count() as f32).collect()
            })
            .collect())
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Embedding("backend offline".to_string()))
    }
}

const ANIMALS: &[&str] = &["cat", "dog", "sat", "on", "mat", "log"];

fn strings(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

#[test]
fn search_finds_most_similar_chunk() {
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["cat sat on mat", "dog sat on log"])).expect("build");
    assert_eq!(index.search("cat", 1).expect("search"), vec!["cat sat on mat"]);
    assert_eq!(index.search("dog", 1).expect("search"), vec!["dog sat on log"]);
}

#[test]
fn search_before_build_is_empty() {
    let index = VectorIndex::new(Box::new(FailingEmbedder));
    assert!(!index.is_built());
    assert!(index.search("anything", 5).expect("search").is_empty());
}

#[test]
fn top_k_larger_than_index_returns_all_in_descending_order() {
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["dog log", "cat", "cat mat", "sat on"])).expect("build");
    let hits = index.search_scored("cat mat", 10).expect("search");
    assert_eq!(hits.len(), 4);
    for pair in hits.windows(2) { assert!(pair[0].score >= pair[1].score); }
    assert_eq!(hits[0].text, "cat mat");
    assert!((hits[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn equal_scores_keep_insertion_order() {
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["dog", "cat on", "on cat", "log"])).expect("build");
    let hits = index.search_scored("cat", 4).expect("search");
    let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["cat on", "on cat", "dog", "log"]);
    assert_eq!(hits[0].ordinal, 1);
    assert_eq!(hits[1].ordinal, 2);
}

#[test]
fn build_deduplicates_before_embedding() {
    let embedder = KeywordEmbedder::new(ANIMALS);
    let embedded = embedder.texts.clone();
    let mut index = VectorIndex::new(Box::new(embedder));
    index.build(&strings(&["cat", "dog", "cat", "dog", "mat"])).expect("build");
    assert_eq!(index.len(), 3);
    assert_eq!(index.chunks(), &strings(&["cat", "dog", "mat"])[..]);
    assert_eq!(embedded.load(Ordering::SeqCst), 3);
}

#[test]
fn build_embeds_in_batches() {
    let embedder = KeywordEmbedder::new(ANIMALS);
    let calls = embedder.calls.clone();
    let mut index = VectorIndex::new(Box::new(embedder)).with_batch_size(2);
    index.build(&strings(&["cat", "dog", "sat", "on", "mat"])).expect("build");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(index.dim(), Some(ANIMALS.len()));
}

#[test]
fn build_rejects_empty_input() {
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    assert!(matches!(index.build(&[]), Err(Error::EmptyInput)));
    assert!(!index.is_built());
}

#[test]
fn build_replaces_previous_index() {
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["cat sat", "cat mat"])).expect("build");
    index.build(&strings(&["dog log"])).expect("rebuild");
    assert_eq!(index.len(), 1);
    assert_eq!(index.search("cat", 5).expect("search"), vec!["dog log"]);
}

#[test]
fn embedding_failure_propagates() {
    let mut index = VectorIndex::new(Box::new(FailingEmbedder));
    assert!(matches!(index.build(&strings(&["cat"])), Err(Error::Embedding(_))));
    assert!(!index.is_built());
}

#[test]
fn save_before_build_fails() {
    let tmp = TempDir::new().unwrap();
    let index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    assert!(matches!(index.save(tmp.path()), Err(Error::NotBuilt)));
}

#[test]
fn save_then_load_reproduces_search_results() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("nested").join("vector_db");
    let corpus = strings(&[
        "Rust ownership rules prevent data races",
        "The borrow checker enforces aliasing rules",
        "Cargo builds crates and manages dependencies",
        "Vectors are normalized before cosine search",
        "Chunks overlap so context is not lost",
    ]);
    let mut index = VectorIndex::new(Box::new(HashEmbedder::new(128)));
    index.build(&corpus).expect("build");
    index.save(&folder).expect("save");
    assert!(folder.join(INDEX_FILE).is_file());
    assert!(folder.join(CHUNKS_FILE).is_file());

    let mut restored = VectorIndex::new(Box::new(HashEmbedder::new(128)));
    assert!(restored.load(&folder).expect("load"));
    assert_eq!(restored.chunks(), index.chunks());
    for (query, k) in [("borrow rules", 2), ("cosine search vectors", 3), ("cargo", 10)] {
        assert_eq!(restored.search(query, k).expect("search"), index.search(query, k).expect("search"));
    }
}

#[test]
fn load_with_missing_artifact_keeps_state() {
    let tmp = TempDir::new().unwrap();
    let complete = tmp.path().join("complete");
    let partial = tmp.path().join("partial");

    let mut other = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    other.build(&strings(&["dog log"])).expect("build");
    other.save(&complete).expect("save");
    std::fs::create_dir_all(&partial).unwrap();
    std::fs::copy(complete.join(INDEX_FILE), partial.join(INDEX_FILE)).unwrap();

    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["cat sat on mat"])).expect("build");
    assert!(!index.load(&partial).expect("load"));
    assert!(!index.load(&tmp.path().join("absent")).expect("load"));
    assert_eq!(index.chunks(), &strings(&["cat sat on mat"])[..]);
    assert_eq!(index.search("cat", 1).expect("search"), vec!["cat sat on mat"]);
}

#[test]
fn load_detects_mismatched_artifacts() {
    let tmp = TempDir::new().unwrap();
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["cat", "dog"])).expect("build");
    index.save(tmp.path()).expect("save");
    std::fs::write(tmp.path().join(CHUNKS_FILE), r#"["cat","dog","extra"]"#).unwrap();

    let mut fresh = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    assert!(matches!(fresh.load(tmp.path()), Err(Error::CorruptState(_))));
    assert!(!fresh.is_built());
}

#[test]
fn load_reports_truncated_artifact_as_corrupt() {
    let tmp = TempDir::new().unwrap();
    let mut index = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    index.build(&strings(&["cat", "dog"])).expect("build");
    index.save(tmp.path()).expect("save");
    std::fs::write(tmp.path().join(CHUNKS_FILE), r#"["cat","d"#).unwrap();

    let mut fresh = VectorIndex::new(Box::new(KeywordEmbedder::new(ANIMALS)));
    assert!(matches!(fresh.load(tmp.path()), Err(Error::CorruptState(_))));
    assert!(!fresh.is_built());
}

#[test]
fn normalized_embedding_has_unit_self_similarity() {
    let embedder = HashEmbedder::new(64);
    let texts = strings(&["the same sentence", "the same sentence"]);
    let mut out = embedder.embed_batch(&texts).expect("embed");
    for v in &mut out { l2_normalize(v); }
    assert!((dot(&out[0], &out[1]) - 1.0).abs() < 1e-6);
}
