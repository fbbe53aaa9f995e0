//! Multi-document indexing module
//!
//! A convenience layer over the core suffix tree: accumulate documents,
//! build one tree per document in parallel, and search all of them at once.
//! Constructions never share state, so parallelism needs no coordination.
//!
//! ## Architecture
//!
//! - `builder`: document ingestion, filtering, parallel build, search
//! - `types`: configuration, stats, and match types

pub mod builder;
pub mod types;

// Re-exports for convenience
pub use builder::{TextIndex, TextIndexBuilder};
pub use types::{DocId, DocMatch, IndexConfig, IndexStats};
