//! docqa-vector
//!
//! Exact cosine-similarity index over chunk texts with two-file persistence.
//! See `index` for the lifecycle and `store` for the on-disk layout.

pub mod index;
pub mod math;
pub mod store;

pub use index::{VectorIndex, DEFAULT_BATCH_SIZE};
pub use store::{CHUNKS_FILE, INDEX_FILE};
