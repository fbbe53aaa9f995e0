//! Types for multi-document suffix tree indexing

use serde::{Deserialize, Serialize};

/// Unique identifier for a document in the index
pub type DocId = u32;

/// A pattern occurrence inside one indexed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocMatch {
    /// Document the pattern was found in
    pub doc_id: DocId,
    /// Byte position within that document
    pub position: usize,
}

/// Configuration for index building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum document size to index (bytes); larger documents are skipped
    pub max_doc_size: u64,
    /// Fold content and patterns to ASCII lowercase
    pub case_insensitive: bool,
    /// Terminator byte appended to every document. Documents containing it
    /// are skipped; the default 0x00 never appears in text content.
    pub terminator: u8,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_doc_size: 10 * 1024 * 1024, // 10MB
            case_insensitive: false,
            terminator: 0x00,
        }
    }
}

/// Summary of a built index
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexStats {
    /// Number of documents indexed
    pub doc_count: u32,
    /// Number of documents skipped (empty, too large, binary-looking, or
    /// containing the terminator byte)
    pub excluded_count: u32,
    /// Total indexed text size, terminators included
    pub total_text_size: u64,
    /// Whether content was case-folded
    pub case_insensitive: bool,
}
