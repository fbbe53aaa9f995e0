//! # sufx - Suffix-Tree Text Indexing
//!
//! sufx builds compressed suffix trees over terminated texts using
//! Ukkonen's online algorithm and exposes them as immutable, queryable
//! indexes for exact substring search.
//!
//! ## Architecture
//!
//! The crate is organized into two main modules:
//!
//! - [`tree`] - Suffix tree construction (Ukkonen's algorithm) and the
//!   immutable tree consumers query
//! - [`index`] - Multi-document layer: filters and ingests documents,
//!   builds one tree per document in parallel, searches across them
//!
//! ## Quick Start
//!
//! ```
//! use sufx::tree::{SuffixTree, TerminatedText};
//!
//! let text = TerminatedText::new(b"mississippi", b'$').unwrap();
//! let tree = SuffixTree::build(text);
//!
//! assert!(tree.contains(b"issip"));
//! assert_eq!(tree.find(b"ss"), Some(2));
//! assert_eq!(tree.longest_repeat(), b"issi");
//! ```
//!
//! ## Performance
//!
//! Construction is amortized linear in the text length: leaf edges share a
//! single moving end cursor, so extending every leaf by one symbol is one
//! counter increment, and suffix links let each phase resume where the
//! previous one stopped. Queries walk edge labels in O(pattern length) and
//! report occurrences in time proportional to their number.

pub mod index;
pub mod tree;
