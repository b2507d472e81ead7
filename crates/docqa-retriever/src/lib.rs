//! docqa-retriever
//!
//! Query-time orchestration: ingest a document into the vector index, then
//! search, rerank and trim its chunks into a bounded context window. The
//! `Assistant` feeds that window to a `Generator` for question answering.

pub mod assistant;
pub mod rerank;
pub mod retriever;

pub use assistant::{render_prompt, Assistant};
pub use rerank::{rank_by_overlap, rerank, trim};
pub use retriever::{Retriever, NO_INFORMATION};
