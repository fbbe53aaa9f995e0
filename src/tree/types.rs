//! Types for suffix tree indexing
//!
//! This module defines the terminated input text, the single input-rejection
//! error, and the immutable tree produced by the builder. The tree is the
//! only construction artifact exposed to callers; construction-time types
//! live in `graph` and never escape.

use memchr::memchr;
use rustc_hash::FxHashMap;

/// Result type for input validation
pub type BuildResult<T> = Result<T, InvalidInput>;

/// Errors raised when the input text violates the terminator contract.
///
/// All validation happens before any construction state is created, so a
/// rejected input never touches a construction graph. Construction itself
/// is total: once a `TerminatedText` exists, building cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// The input was empty where a terminated sequence was required
    EmptyText,
    /// The terminator symbol occurs at a non-final position
    MisplacedTerminator {
        /// Byte offset of the offending occurrence
        position: usize,
    },
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::EmptyText => write!(f, "Text is empty"),
            InvalidInput::MisplacedTerminator { position } => {
                write!(f, "Terminator symbol occurs at non-final position {}", position)
            }
        }
    }
}

impl std::error::Error for InvalidInput {}

/// An input text plus a unique terminator symbol.
///
/// The terminator occurs exactly once, as the last symbol. This guarantees
/// that no suffix is a prefix of another, so every suffix of the sequence
/// ends at its own leaf in the finished tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminatedText {
    bytes: Vec<u8>,
    terminator: u8,
}

impl TerminatedText {
    /// Append `terminator` to `content` after checking it does not already
    /// occur anywhere in `content`.
    pub fn new(content: &[u8], terminator: u8) -> BuildResult<Self> {
        if let Some(position) = memchr(terminator, content) {
            return Err(InvalidInput::MisplacedTerminator { position });
        }
        let mut bytes = Vec::with_capacity(content.len() + 1);
        bytes.extend_from_slice(content);
        bytes.push(terminator);
        Ok(Self { bytes, terminator })
    }

    /// Interpret an already-terminated sequence: the last byte is the
    /// terminator and must not occur earlier.
    pub fn from_bytes(bytes: Vec<u8>) -> BuildResult<Self> {
        let Some(&terminator) = bytes.last() else {
            return Err(InvalidInput::EmptyText);
        };
        if let Some(position) = memchr(terminator, &bytes[..bytes.len() - 1]) {
            return Err(InvalidInput::MisplacedTerminator { position });
        }
        Ok(Self { bytes, terminator })
    }

    /// Full sequence, terminator included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The sequence without its terminator
    pub fn content(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// Number of symbols including the terminator (always >= 1)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, u8) {
        (self.bytes, self.terminator)
    }
}

/// A compressed edge label: `text[start..start + len)`.
///
/// Edges never copy text; consumers materialize labels through
/// [`SuffixTree::edge_label`]. Length is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Start offset of the label in the indexed text
    pub start: usize,
    /// Label length in symbols
    pub len: usize,
}

impl Edge {
    /// Exclusive end offset of the label
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A node of the finished tree: either an internal branch point or a leaf
/// marking where one suffix of the text begins.
///
/// The root is an `Internal` node. Internal nodes key their outgoing edges
/// by the first symbol of the edge label, so no two edges out of one node
/// can share a first symbol.
#[derive(Debug)]
pub enum Node {
    Internal(InternalNode),
    Leaf(LeafNode),
}

/// Branch point with at least two children (except possibly the root)
#[derive(Debug)]
pub struct InternalNode {
    pub(crate) children: FxHashMap<u8, Child>,
}

/// Leaf carrying the start index of the suffix it represents
#[derive(Debug, PartialEq, Eq)]
pub struct LeafNode {
    pub(crate) suffix_start: usize,
}

/// An outgoing edge together with the subtree it leads to
#[derive(Debug)]
pub struct Child {
    pub(crate) edge: Edge,
    pub(crate) node: Node,
}

/// Structural equality with an explicit worklist of node pairs. The derived
/// impl would recurse one frame per tree level, and trees can be as deep as
/// the text is long.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Node::Leaf(a), Node::Leaf(b)) => {
                    if a.suffix_start != b.suffix_start {
                        return false;
                    }
                }
                (Node::Internal(a), Node::Internal(b)) => {
                    if a.children.len() != b.children.len() {
                        return false;
                    }
                    for (symbol, left) in &a.children {
                        let Some(right) = b.children.get(symbol) else {
                            return false;
                        };
                        if left.edge != right.edge {
                            return false;
                        }
                        pending.push((&left.node, &right.node));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Node {}

/// The derived destructor recurses one frame per tree level. Draining
/// children into a worklist leaves every popped node empty by the time it
/// drops, so destruction is iterative regardless of tree depth.
impl Drop for InternalNode {
    fn drop(&mut self) {
        let mut pending: Vec<Node> = self.children.drain().map(|(_, c)| c.node).collect();
        while let Some(node) = pending.pop() {
            if let Node::Internal(mut inner) = node {
                pending.extend(inner.children.drain().map(|(_, c)| c.node));
            }
        }
    }
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// For a leaf, the index in the text where its suffix begins
    pub fn suffix_start(&self) -> Option<usize> {
        match self {
            Node::Leaf(leaf) => Some(leaf.suffix_start),
            Node::Internal(_) => None,
        }
    }

    /// Resolve the child whose edge label begins with `symbol`
    pub fn child(&self, symbol: u8) -> Option<(&Edge, &Node)> {
        match self {
            Node::Internal(inner) => {
                inner.children.get(&symbol).map(|c| (&c.edge, &c.node))
            }
            Node::Leaf(_) => None,
        }
    }

    /// Enumerate outgoing `(first symbol, edge, child)` triples
    pub fn children(&self) -> impl Iterator<Item = (u8, &Edge, &Node)> {
        let map = match self {
            Node::Internal(inner) => Some(&inner.children),
            Node::Leaf(_) => None,
        };
        map.into_iter()
            .flat_map(|m| m.iter().map(|(&sym, c)| (sym, &c.edge, &c.node)))
    }

    pub fn child_count(&self) -> usize {
        match self {
            Node::Internal(inner) => inner.children.len(),
            Node::Leaf(_) => 0,
        }
    }
}

/// An immutable, edge-compressed suffix tree over a terminated text.
///
/// Leaves are exactly the suffixes of the text; internal nodes branch on the
/// first symbol of their outgoing edges. Suffix links are a construction
/// artifact and are not part of this type.
#[derive(Debug)]
pub struct SuffixTree {
    pub(crate) text: Vec<u8>,
    pub(crate) terminator: u8,
    pub(crate) root: Node,
}

impl PartialEq for SuffixTree {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.terminator == other.terminator
            && self.root == other.root
    }
}

impl Eq for SuffixTree {}

impl SuffixTree {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The indexed sequence, terminator(s) included
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// Number of indexed symbols including terminator(s)
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Materialize an edge label against the indexed text
    pub fn edge_label(&self, edge: &Edge) -> &[u8] {
        &self.text[edge.start..edge.end()]
    }

    /// Whether `pattern` occurs as a substring of the indexed text
    pub fn contains(&self, pattern: &[u8]) -> bool {
        self.locate(pattern).is_some()
    }

    /// Smallest start position of `pattern` in the indexed text
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        self.occurrences(pattern).into_iter().min()
    }

    /// All start positions of `pattern` in the indexed text, unordered.
    ///
    /// Locates the pattern by walking edge labels, then collects the suffix
    /// start of every leaf below the locus with an explicit stack (trees can
    /// be as deep as the text is long).
    pub fn occurrences(&self, pattern: &[u8]) -> Vec<usize> {
        let Some(locus) = self.locate(pattern) else {
            return Vec::new();
        };
        let mut positions = Vec::new();
        let mut stack = vec![locus];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(leaf) => positions.push(leaf.suffix_start),
                Node::Internal(inner) => {
                    stack.extend(inner.children.values().map(|c| &c.node));
                }
            }
        }
        positions
    }

    /// Total number of leaves (for a single-text tree, the number of
    /// suffixes of the text)
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(_) => count += 1,
                Node::Internal(inner) => {
                    stack.extend(inner.children.values().map(|c| &c.node));
                }
            }
        }
        count
    }

    /// Longest substring that occurs at least twice in the indexed text.
    ///
    /// Every repeated substring is the path label of an internal node, so
    /// the answer is the deepest internal node by path length. Found by
    /// walking to each leaf and scoring its parent's path depth.
    pub fn longest_repeat(&self) -> &[u8] {
        let mut best_start = 0;
        let mut best_len = 0;
        // (node, path length to node, incoming edge length)
        let mut stack = vec![(&self.root, 0usize, 0usize)];
        while let Some((node, depth, edge_len)) = stack.pop() {
            match node {
                Node::Leaf(leaf) => {
                    let parent_depth = depth - edge_len;
                    if parent_depth > best_len {
                        best_len = parent_depth;
                        best_start = leaf.suffix_start;
                    }
                }
                Node::Internal(inner) => {
                    stack.extend(
                        inner
                            .children
                            .values()
                            .map(|c| (&c.node, depth + c.edge.len, c.edge.len)),
                    );
                }
            }
        }
        &self.text[best_start..best_start + best_len]
    }

    /// Walk the tree along `pattern`, returning the subtree rooted at the
    /// match locus. `None` when the pattern does not occur.
    fn locate(&self, pattern: &[u8]) -> Option<&Node> {
        if pattern.is_empty() {
            return Some(&self.root);
        }
        let mut node = &self.root;
        let mut matched = 0;
        while matched < pattern.len() {
            let (edge, child) = node.child(pattern[matched])?;
            let label = self.edge_label(edge);
            let take = label.len().min(pattern.len() - matched);
            if pattern[matched..matched + take] != label[..take] {
                return None;
            }
            matched += take;
            node = child;
        }
        Some(node)
    }
}
