//! Suffix tree construction and querying
//!
//! This module provides online construction of a compressed suffix tree
//! (Ukkonen's algorithm, linear amortized time) and the immutable tree it
//! produces for O(m) substring queries.
//!
//! ## Architecture
//!
//! - `types`: terminated input text, input validation, the immutable tree
//!   and its consumer API
//! - `graph`: mutable arena-indexed construction graph (crate-private)
//! - `builder`: the phase/extension engine driving construction
//! - `finalize`: conversion from construction graph to immutable tree
//!
//! Construction-time state never escapes: callers see only
//! [`TerminatedText`] going in and [`SuffixTree`] coming out.

pub mod builder;
pub mod types;

mod finalize;
mod graph;

// Re-exports for convenience
pub use types::{BuildResult, Edge, InvalidInput, Node, SuffixTree, TerminatedText};
