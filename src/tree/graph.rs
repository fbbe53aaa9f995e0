//! Mutable construction graph
//!
//! The graph the engine mutates while phases run. Nodes live in an arena and
//! point at each other through stable indices, never references: suffix
//! links are set after the linked-to node already exists, and leaf edges all
//! alias one moving end cursor, so index-based addressing is the only shape
//! that borrows cleanly. Nothing in here survives finalization.

use rustc_hash::FxHashMap;

pub(crate) type NodeId = usize;

/// The root is always the first arena slot
pub(crate) const ROOT: NodeId = 0;

/// Where an edge label stops.
///
/// `Moving` edges belong to leaves and resolve against the build-wide
/// frontier, so one cursor increment per phase extends every leaf edge at
/// once. `Fixed` ends are frozen exactly once, when a leaf edge is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeEnd {
    Moving,
    Fixed(usize),
}

/// Compressed edge: label is `text[start..end)` with `end` resolved
/// against the frontier for moving edges.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GraphEdge {
    pub(crate) start: usize,
    pub(crate) end: EdgeEnd,
    pub(crate) child: NodeId,
}

#[derive(Debug)]
pub(crate) struct GraphNode {
    pub(crate) children: FxHashMap<u8, GraphEdge>,
    pub(crate) suffix_link: Option<NodeId>,
    /// Set iff this node is a leaf; leaves never gain children
    pub(crate) suffix_start: Option<usize>,
}

impl GraphNode {
    fn branch() -> Self {
        Self {
            children: FxHashMap::default(),
            suffix_link: None,
            suffix_start: None,
        }
    }

    fn leaf(suffix_start: usize) -> Self {
        Self {
            children: FxHashMap::default(),
            suffix_link: None,
            suffix_start: Some(suffix_start),
        }
    }
}

/// Arena-backed construction graph plus the per-build moving end cursor
#[derive(Debug)]
pub(crate) struct Graph {
    nodes: Vec<GraphNode>,
    /// Exclusive end of every moving edge; advanced once per phase
    pub(crate) frontier: usize,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![GraphNode::branch()],
            frontier: 0,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Outgoing edge of `node` whose label starts with `symbol`
    pub(crate) fn child_edge(&self, node: NodeId, symbol: u8) -> Option<GraphEdge> {
        self.nodes[node].children.get(&symbol).copied()
    }

    /// Label length of `edge`, resolving moving ends against the frontier
    pub(crate) fn edge_len(&self, edge: &GraphEdge) -> usize {
        match edge.end {
            EdgeEnd::Moving => self.frontier - edge.start,
            EdgeEnd::Fixed(end) => end - edge.start,
        }
    }

    pub(crate) fn suffix_link(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].suffix_link
    }

    pub(crate) fn set_suffix_link(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from].suffix_link = Some(to);
    }

    /// Attach a fresh leaf under `parent`; its edge starts at `start` and
    /// keeps growing with the frontier.
    pub(crate) fn add_leaf(
        &mut self,
        parent: NodeId,
        symbol: u8,
        start: usize,
        suffix_start: usize,
    ) -> NodeId {
        let child = self.push(GraphNode::leaf(suffix_start));
        self.nodes[parent].children.insert(
            symbol,
            GraphEdge {
                start,
                end: EdgeEnd::Moving,
                child,
            },
        );
        child
    }

    /// Split the edge out of `parent` keyed by `symbol` after `offset`
    /// label symbols. A new internal node takes over the head of the label;
    /// the old child keeps the tail, re-keyed by `mid_symbol` (the symbol at
    /// the split point). Returns the new internal node.
    pub(crate) fn split_edge(
        &mut self,
        parent: NodeId,
        symbol: u8,
        offset: usize,
        mid_symbol: u8,
    ) -> NodeId {
        let old = self.nodes[parent].children[&symbol];
        debug_assert!(offset >= 1 && offset < self.edge_len(&old));

        let split = self.push(GraphNode::branch());
        self.nodes[split].children.insert(
            mid_symbol,
            GraphEdge {
                start: old.start + offset,
                end: old.end,
                child: old.child,
            },
        );
        self.nodes[parent].children.insert(
            symbol,
            GraphEdge {
                start: old.start,
                end: EdgeEnd::Fixed(old.start + offset),
                child: split,
            },
        );
        split
    }

    fn push(&mut self, node: GraphNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_edge_tracks_frontier() {
        let mut graph = Graph::new();
        graph.frontier = 1;
        let leaf = graph.add_leaf(ROOT, b'a', 0, 0);
        let edge = graph.child_edge(ROOT, b'a').unwrap();
        assert_eq!(edge.child, leaf);
        assert_eq!(graph.edge_len(&edge), 1);

        // One cursor bump lengthens the leaf edge without touching it
        graph.frontier = 5;
        assert_eq!(graph.edge_len(&edge), 5);
    }

    #[test]
    fn test_split_freezes_head_and_keeps_tail() {
        // text: "abcd", leaf edge "abcd", split after "ab"
        let mut graph = Graph::new();
        graph.frontier = 4;
        let leaf = graph.add_leaf(ROOT, b'a', 0, 0);
        let split = graph.split_edge(ROOT, b'a', 2, b'c');

        let head = graph.child_edge(ROOT, b'a').unwrap();
        assert_eq!(head.child, split);
        assert_eq!(head.end, EdgeEnd::Fixed(2));
        assert_eq!(graph.edge_len(&head), 2);

        let tail = graph.child_edge(split, b'c').unwrap();
        assert_eq!(tail.child, leaf);
        assert_eq!(tail.start, 2);
        assert_eq!(tail.end, EdgeEnd::Moving);
        assert_eq!(graph.edge_len(&tail), 2);

        // Tail still follows the frontier, head stays frozen
        graph.frontier = 6;
        assert_eq!(graph.edge_len(&graph.child_edge(split, b'c').unwrap()), 4);
        assert_eq!(graph.edge_len(&graph.child_edge(ROOT, b'a').unwrap()), 2);
    }

    #[test]
    fn test_suffix_links() {
        let mut graph = Graph::new();
        graph.frontier = 2;
        let a = graph.add_leaf(ROOT, b'a', 0, 0);
        let b = graph.add_leaf(ROOT, b'b', 1, 1);
        assert_eq!(graph.suffix_link(a), None);
        graph.set_suffix_link(a, b);
        assert_eq!(graph.suffix_link(a), Some(b));
    }
}
