//! Multi-document index builder
//!
//! Accumulates documents, filters out what cannot or should not be indexed,
//! then builds one suffix tree per document. Builds are independent (no
//! state is shared between two constructions), so the heavy step runs in
//! parallel, as do searches across the finished trees.

use super::types::{DocId, DocMatch, IndexConfig, IndexStats};
use crate::tree::{SuffixTree, TerminatedText};
use rayon::prelude::*;

/// Builder for a searchable multi-document index
pub struct TextIndexBuilder {
    config: IndexConfig,
    pending: Vec<(DocId, TerminatedText)>,
    excluded_count: u32,
}

impl TextIndexBuilder {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            excluded_count: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(IndexConfig::default())
    }

    /// Add a document to the index.
    ///
    /// Returns `true` if the document was accepted, `false` if it was
    /// skipped (empty, too large, binary-looking, or containing the
    /// terminator byte).
    pub fn add_document(&mut self, doc_id: DocId, content: &[u8]) -> bool {
        if content.is_empty() {
            self.excluded_count += 1;
            return false;
        }
        if content.len() as u64 > self.config.max_doc_size {
            self.excluded_count += 1;
            return false;
        }
        if is_likely_binary(content) {
            self.excluded_count += 1;
            return false;
        }

        let folded;
        let content = if self.config.case_insensitive {
            folded = content.to_ascii_lowercase();
            folded.as_slice()
        } else {
            content
        };

        match TerminatedText::new(content, self.config.terminator) {
            Ok(text) => {
                self.pending.push((doc_id, text));
                true
            }
            Err(_) => {
                // Terminator byte present in the content itself
                self.excluded_count += 1;
                false
            }
        }
    }

    /// Number of documents accepted so far
    pub fn doc_count(&self) -> usize {
        self.pending.len()
    }

    /// Build all document trees. This is the main computation; each tree is
    /// an independent single-threaded construction, so documents are
    /// processed in parallel.
    pub fn build(self) -> TextIndex {
        let docs: Vec<IndexedDoc> = self
            .pending
            .into_par_iter()
            .map(|(doc_id, text)| IndexedDoc {
                doc_id,
                tree: SuffixTree::build(text),
            })
            .collect();

        TextIndex {
            docs,
            config: self.config,
            excluded_count: self.excluded_count,
        }
    }
}

struct IndexedDoc {
    doc_id: DocId,
    tree: SuffixTree,
}

/// A searchable collection of per-document suffix trees
pub struct TextIndex {
    docs: Vec<IndexedDoc>,
    config: IndexConfig,
    excluded_count: u32,
}

impl TextIndex {
    /// All occurrences of `pattern` across the index, sorted by document
    /// and position
    pub fn find(&self, pattern: &[u8]) -> Vec<DocMatch> {
        let folded;
        let pattern = if self.config.case_insensitive {
            folded = pattern.to_ascii_lowercase();
            folded.as_slice()
        } else {
            pattern
        };

        let mut matches: Vec<DocMatch> = self
            .docs
            .par_iter()
            .flat_map_iter(|doc| {
                doc.tree
                    .occurrences(pattern)
                    .into_iter()
                    .map(|position| DocMatch {
                        doc_id: doc.doc_id,
                        position,
                    })
            })
            .collect();
        matches.sort_unstable();
        matches
    }

    /// Whether any indexed document contains `pattern`
    pub fn contains(&self, pattern: &[u8]) -> bool {
        let folded;
        let pattern = if self.config.case_insensitive {
            folded = pattern.to_ascii_lowercase();
            folded.as_slice()
        } else {
            pattern
        };
        self.docs.par_iter().any(|doc| doc.tree.contains(pattern))
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            doc_count: self.docs.len() as u32,
            excluded_count: self.excluded_count,
            total_text_size: self.docs.iter().map(|d| d.tree.len() as u64).sum(),
            case_insensitive: self.config.case_insensitive,
        }
    }
}

/// Heuristic binary check: sample the head of the document for null bytes
/// or a high share of non-text bytes.
fn is_likely_binary(content: &[u8]) -> bool {
    let sample = &content[..content.len().min(8192)];
    if sample.contains(&0) {
        return true;
    }
    let non_text = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();
    non_text > sample.len() / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_find() {
        let mut builder = TextIndexBuilder::with_defaults();
        assert!(builder.add_document(1, b"the quick brown fox"));
        assert!(builder.add_document(2, b"quickly now"));
        assert!(builder.add_document(3, b"nothing here"));
        let index = builder.build();

        let matches = index.find(b"quick");
        assert_eq!(
            matches,
            vec![
                DocMatch { doc_id: 1, position: 4 },
                DocMatch { doc_id: 2, position: 0 },
            ]
        );
        assert!(index.contains(b"fox"));
        assert!(!index.contains(b"wolf"));
    }

    #[test]
    fn test_repeated_pattern_positions() {
        let mut builder = TextIndexBuilder::with_defaults();
        builder.add_document(7, b"abracadabra");
        let index = builder.build();

        let matches = index.find(b"abra");
        assert_eq!(
            matches,
            vec![
                DocMatch { doc_id: 7, position: 0 },
                DocMatch { doc_id: 7, position: 7 },
            ]
        );
    }

    #[test]
    fn test_skips_binary_and_oversized() {
        let mut builder = TextIndexBuilder::new(IndexConfig {
            max_doc_size: 64,
            ..Default::default()
        });
        assert!(!builder.add_document(1, b"has a null \x00 byte"));
        assert!(!builder.add_document(2, &[b'x'; 128]));
        assert!(!builder.add_document(3, b""));
        assert!(builder.add_document(4, b"fine"));

        let index = builder.build();
        let stats = index.stats();
        assert_eq!(stats.doc_count, 1);
        assert_eq!(stats.excluded_count, 3); // null byte, oversized, empty
        assert_eq!(stats.total_text_size, 5); // "fine" + terminator
    }

    #[test]
    fn test_case_folding() {
        let mut builder = TextIndexBuilder::new(IndexConfig {
            case_insensitive: true,
            ..Default::default()
        });
        builder.add_document(1, b"Hello World");
        let index = builder.build();

        assert!(index.contains(b"hello"));
        assert!(index.contains(b"HELLO"));
        assert_eq!(index.find(b"World")[0].position, 6);
    }

    #[test]
    fn test_custom_terminator_excludes_conflicting_docs() {
        let mut builder = TextIndexBuilder::new(IndexConfig {
            terminator: b'$',
            ..Default::default()
        });
        assert!(!builder.add_document(1, b"price: $5"));
        assert!(builder.add_document(2, b"no sigil"));
        let index = builder.build();
        assert_eq!(index.stats().excluded_count, 1);
        assert_eq!(index.doc_count(), 1);
    }
}
