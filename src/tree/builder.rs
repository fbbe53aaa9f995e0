//! Online suffix tree construction (Ukkonen's algorithm)
//!
//! The engine runs one phase per text symbol. Each phase advances the moving
//! end cursor once, which extends every existing leaf edge for free (Rule 1
//! is never a loop), then performs explicit extensions until either all
//! pending suffixes are represented or a match ends the phase early
//! (Rule 3, the show-stopper). Amortized over all phases the work is linear:
//! the active point only ever moves forward along the text or down a suffix
//! link, and the suffix-link chain built within each phase lets later
//! extensions skip re-walking from the root.

use memchr::memchr;

use super::finalize::finalize;
use super::graph::{Graph, NodeId, ROOT};
use super::types::{BuildResult, InvalidInput, SuffixTree, TerminatedText};

impl SuffixTree {
    /// Build the suffix tree of `text`.
    ///
    /// Total over its input: every rejection already happened when the
    /// [`TerminatedText`] was constructed. The produced tree has exactly
    /// `text.len()` leaves, one per suffix.
    pub fn build(text: TerminatedText) -> SuffixTree {
        let graph = Engine::run(text.as_bytes());
        let root = finalize(graph, text.as_bytes(), None);
        let (bytes, terminator) = text.into_parts();
        SuffixTree {
            text: bytes,
            terminator,
            root,
        }
    }

    /// Build one tree over the concatenation of several documents, each
    /// closed by `terminator`.
    ///
    /// Every document is validated against the shared terminator before any
    /// construction state exists. During finalization, edges spanning past a
    /// document boundary are truncated at the terminator and their subtrees
    /// discarded, so no path mixes symbols of two documents. Suffixes of
    /// different documents that agree up to their terminators collapse onto
    /// one path, which is the desired behavior for cross-document matching.
    pub fn build_generalized(docs: &[&[u8]], terminator: u8) -> BuildResult<SuffixTree> {
        if docs.is_empty() {
            return Err(InvalidInput::EmptyText);
        }
        let mut concatenated = Vec::with_capacity(docs.iter().map(|d| d.len() + 1).sum());
        for doc in docs {
            if let Some(offset) = memchr(terminator, doc) {
                return Err(InvalidInput::MisplacedTerminator {
                    position: concatenated.len() + offset,
                });
            }
            concatenated.extend_from_slice(doc);
            concatenated.push(terminator);
        }
        let graph = Engine::run(&concatenated);
        let root = finalize(graph, &concatenated, Some(terminator));
        Ok(SuffixTree {
            text: concatenated,
            terminator,
            root,
        })
    }
}

/// Active point: the engine's cursor into the tree under construction.
///
/// `length` symbols are matched along the edge out of `node` whose label
/// starts with `text[edge_start]`; `edge_start` is meaningful only while
/// `length > 0`. Canonical form invariant: `length` is strictly smaller
/// than the length of the edge it names.
#[derive(Debug, Clone, Copy)]
struct ActivePoint {
    node: NodeId,
    edge_start: usize,
    length: usize,
}

/// Iteration state driving the phase/extension protocol
struct Engine<'t> {
    text: &'t [u8],
    graph: Graph,
    active: ActivePoint,
    /// Suffixes not yet explicitly represented in the current phase
    remaining: usize,
    /// Internal node created (or confirmed) by the previous extension of
    /// the current phase, waiting for its suffix link
    pending_link: Option<NodeId>,
}

impl<'t> Engine<'t> {
    fn run(text: &'t [u8]) -> Graph {
        let mut engine = Engine {
            text,
            graph: Graph::new(),
            active: ActivePoint {
                node: ROOT,
                edge_start: 0,
                length: 0,
            },
            remaining: 0,
            pending_link: None,
        };
        for phase in 0..text.len() {
            engine.extend(phase);
        }
        engine.graph
    }

    /// One phase: incorporate the symbol at position `i`.
    fn extend(&mut self, i: usize) {
        // Rule 1: one cursor bump extends all current leaf edges
        self.graph.frontier = i + 1;
        self.remaining += 1;
        self.pending_link = None;

        while self.remaining > 0 {
            if self.active.length == 0 {
                self.active.edge_start = i;
            }
            let first = self.text[self.active.edge_start];

            match self.graph.child_edge(self.active.node, first) {
                None => {
                    // Rule 2, no split: pending suffix attaches directly
                    let suffix_start = i + 1 - self.remaining;
                    self.graph.add_leaf(self.active.node, first, i, suffix_start);
                    self.chain_link(self.active.node);
                }
                Some(edge) if self.text[edge.start + self.active.length] == self.text[i] => {
                    // Rule 3: suffix already present; the phase ends here
                    // and the frontier handles the rest implicitly.
                    self.active.length += 1;
                    self.chain_link(self.active.node);
                    self.canonicalize();
                    return;
                }
                Some(edge) => {
                    // Rule 2 with split: the active edge diverges from the
                    // current symbol `length` symbols in.
                    let mid_symbol = self.text[edge.start + self.active.length];
                    let split = self.graph.split_edge(
                        self.active.node,
                        first,
                        self.active.length,
                        mid_symbol,
                    );
                    let suffix_start = i + 1 - self.remaining;
                    self.graph.add_leaf(split, self.text[i], i, suffix_start);
                    self.chain_link(split);
                }
            }

            self.remaining -= 1;
            if self.active.node == ROOT && self.active.length > 0 {
                // Same pending suffix minus its first symbol
                self.active.length -= 1;
                self.active.edge_start = i + 1 - self.remaining;
            } else {
                self.active.node = self.graph.suffix_link(self.active.node).unwrap_or(ROOT);
            }
            self.canonicalize();
        }
    }

    /// Chain the suffix link of the node created by the previous extension
    /// of this phase to `node`, and leave `node` pending in its place.
    ///
    /// The chain is what makes later extensions reuse earlier work: each
    /// newly split node's path equals the previous one's path minus its
    /// first symbol. A link is never left pending on the root.
    fn chain_link(&mut self, node: NodeId) {
        if let Some(previous) = self.pending_link.take() {
            self.graph.set_suffix_link(previous, node);
        }
        self.pending_link = (node != ROOT).then_some(node);
    }

    /// Restore the canonical form: the active length must not reach the end
    /// of the edge it names.
    ///
    /// Descends one node boundary per step. An overshoot can cascade across
    /// several boundaries in one call (after a suffix-link jump the
    /// analogous edges below the new node may be shorter), so this loops
    /// until the active point names a position strictly inside an edge or
    /// sits at a node with length zero.
    fn canonicalize(&mut self) {
        while self.active.length > 0 {
            let first = self.text[self.active.edge_start];
            let Some(edge) = self.graph.child_edge(self.active.node, first) else {
                return;
            };
            let edge_len = self.graph.edge_len(&edge);
            if self.active.length < edge_len {
                return;
            }
            self.active.node = edge.child;
            self.active.edge_start += edge_len;
            self.active.length -= edge_len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::types::Node;

    fn tree(content: &[u8]) -> SuffixTree {
        SuffixTree::build(TerminatedText::new(content, b'$').unwrap())
    }

    /// Collect every root-to-leaf path label, sorted
    fn leaf_paths(tree: &SuffixTree) -> Vec<Vec<u8>> {
        let mut paths = Vec::new();
        let mut stack: Vec<(&Node, Vec<u8>)> = vec![(tree.root(), Vec::new())];
        while let Some((node, prefix)) = stack.pop() {
            if node.is_leaf() {
                paths.push(prefix);
                continue;
            }
            for (_, edge, child) in node.children() {
                let mut path = prefix.clone();
                path.extend_from_slice(tree.edge_label(edge));
                stack.push((child, path));
            }
        }
        paths.sort();
        paths
    }

    fn suffixes(text: &[u8]) -> Vec<Vec<u8>> {
        let mut all: Vec<Vec<u8>> = (0..text.len()).map(|i| text[i..].to_vec()).collect();
        all.sort();
        all
    }

    #[test]
    fn test_distinct_symbols() {
        // Scenario: "abc$" has no repeats, so the root holds all four
        // suffixes as direct leaves and nothing else.
        let tree = tree(b"abc");
        assert_eq!(tree.root().child_count(), 4);
        for (_, edge, child) in tree.root().children() {
            assert!(child.is_leaf());
            assert_eq!(
                tree.edge_label(edge),
                &tree.text()[child.suffix_start().unwrap()..]
            );
        }
        assert_eq!(leaf_paths(&tree), suffixes(b"abc$"));
    }

    #[test]
    fn test_repeated_prefix_splits() {
        // "aab$": the two suffixes starting with 'a' share an internal node
        // reached by edge "a".
        let tree = tree(b"aab");
        assert_eq!(tree.root().child_count(), 3);

        let (edge, inner) = tree.root().child(b'a').unwrap();
        assert_eq!(tree.edge_label(edge), b"a");
        assert!(!inner.is_leaf());
        assert_eq!(inner.child_count(), 2);

        let (ab_edge, ab_leaf) = inner.child(b'a').unwrap();
        assert_eq!(tree.edge_label(ab_edge), b"ab$");
        assert_eq!(ab_leaf.suffix_start(), Some(0));

        let (b_edge, b_leaf) = inner.child(b'b').unwrap();
        assert_eq!(tree.edge_label(b_edge), b"b$");
        assert_eq!(b_leaf.suffix_start(), Some(1));

        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_terminator_only() {
        let tree = tree(b"");
        assert_eq!(tree.root().child_count(), 1);
        let (edge, leaf) = tree.root().child(b'$').unwrap();
        assert_eq!(tree.edge_label(edge), b"$");
        assert_eq!(leaf.suffix_start(), Some(0));
    }

    #[test]
    fn test_banana() {
        let tree = tree(b"banana");
        assert_eq!(tree.leaf_count(), 7);
        assert_eq!(leaf_paths(&tree), suffixes(b"banana$"));
    }

    #[test]
    fn test_suffix_link_chains_across_extensions() {
        // Exercises the case where a node split early in a phase receives
        // its link from a later extension that only confirmed an existing
        // node (no split of its own).
        let tree = tree(b"anxnyanyanz");
        assert_eq!(tree.leaf_count(), 12);
        assert_eq!(leaf_paths(&tree), suffixes(b"anxnyanyanz$"));
    }

    #[test]
    fn test_split_below_split() {
        let tree = tree(b"abcabxabcd");
        assert_eq!(leaf_paths(&tree), suffixes(b"abcabxabcd$"));
    }

    #[test]
    fn test_unary_text() {
        // Maximally repetitive input: every phase after the first is a
        // show-stopper until the terminator arrives.
        let tree = tree(&[b'a'; 64]);
        assert_eq!(tree.leaf_count(), 65);
        assert_eq!(leaf_paths(&tree), suffixes(&{
            let mut t = vec![b'a'; 64];
            t.push(b'$');
            t
        }));
    }

    #[test]
    fn test_internal_nodes_branch() {
        // No unary compaction artifacts: every internal node except
        // possibly the root has at least two children.
        let tree = tree(b"mississippi");
        let mut stack = vec![tree.root()];
        let mut first = true;
        while let Some(node) = stack.pop() {
            if !node.is_leaf() && !std::mem::take(&mut first) {
                assert!(node.child_count() >= 2);
            }
            for (_, _, child) in node.children() {
                stack.push(child);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = tree(b"abracadabra");
        let b = tree(b"abracadabra");
        assert_eq!(a, b);
    }

    #[test]
    fn test_generalized_truncates_at_boundaries() {
        let tree = SuffixTree::build_generalized(&[b"abab", b"aba"], 0).unwrap();
        // No path crosses a document boundary: every suffix of either
        // document is findable, but no concatenation artifact is.
        assert!(tree.contains(b"abab"));
        assert!(tree.contains(b"aba"));
        assert!(tree.contains(b"bab"));
        assert!(!tree.contains(b"ababa"));
        assert!(!tree.contains(&[b'b', 0, b'a']));
    }

    #[test]
    fn test_generalized_rejects_terminator_in_doc() {
        let err = SuffixTree::build_generalized(&[b"ok", &[b'a', 0, b'b']], 0).unwrap_err();
        assert_eq!(err, InvalidInput::MisplacedTerminator { position: 4 });
        assert_eq!(
            SuffixTree::build_generalized(&[], 0).unwrap_err(),
            InvalidInput::EmptyText
        );
    }
}
