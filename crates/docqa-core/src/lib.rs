//! docqa-core
//!
//! Shared vocabulary for the docqa workspace: the error taxonomy, the
//! capability traits implemented by embedding and generation backends, the
//! word-window chunker and the layered configuration.

pub mod chunker;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
