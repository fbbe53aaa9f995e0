//! Construction graph to immutable tree conversion
//!
//! The single translation boundary between the mutable, arena-indexed
//! construction graph and the recursively-owned tree handed to consumers.
//! Traversal is an explicit post-order stack: suffix trees can be as deep
//! as the text is long, so call recursion would overflow on degenerate
//! inputs (a long unary text produces a path of that length).

use memchr::memchr;
use rustc_hash::FxHashMap;

use super::graph::{Graph, GraphEdge, NodeId, ROOT};
use super::types::{Child, Edge, InternalNode, LeafNode, Node};

/// One stack entry per node, pushed twice: once to discover children, once
/// to emit the node after all of them are built.
enum Visit {
    Discover(NodeId),
    Emit(NodeId),
}

/// Consume `graph`, producing the immutable root node.
///
/// Moving leaf-edge ends are snapshotted against the final frontier; suffix
/// links are simply dropped. With `truncate_at` set (generalized trees),
/// any edge whose label crosses that terminator before its last symbol is
/// cut at the terminator and its subtree replaced by a leaf.
pub(crate) fn finalize(graph: Graph, text: &[u8], truncate_at: Option<u8>) -> Node {
    let mut built: Vec<Option<Node>> = (0..graph.len()).map(|_| None).collect();
    // Path length from the root, recorded at discovery; needed to recover
    // suffix starts for truncated edges.
    let mut depths: Vec<usize> = vec![0; graph.len()];

    let mut stack = vec![Visit::Discover(ROOT)];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Discover(id) => {
                let node = graph.node(id);
                if let Some(suffix_start) = node.suffix_start {
                    built[id] = Some(Node::Leaf(LeafNode { suffix_start }));
                    continue;
                }
                stack.push(Visit::Emit(id));
                for edge in node.children.values() {
                    if truncation(edge, &graph, text, truncate_at).is_some() {
                        // Subtree discarded; the edge becomes a leaf at emit
                        continue;
                    }
                    depths[edge.child] = depths[id] + graph.edge_len(edge);
                    stack.push(Visit::Discover(edge.child));
                }
            }
            Visit::Emit(id) => {
                let depth = depths[id];
                let mut children = FxHashMap::default();
                for (&symbol, edge) in &graph.node(id).children {
                    let child = match truncation(edge, &graph, text, truncate_at) {
                        Some(cut) => Child {
                            edge: Edge {
                                start: edge.start,
                                len: cut - edge.start + 1,
                            },
                            node: Node::Leaf(LeafNode {
                                suffix_start: edge.start - depth,
                            }),
                        },
                        None => Child {
                            edge: Edge {
                                start: edge.start,
                                len: graph.edge_len(edge),
                            },
                            node: built[edge.child]
                                .take()
                                .expect("children emitted before their parent"),
                        },
                    };
                    children.insert(symbol, child);
                }
                built[id] = Some(Node::Internal(InternalNode { children }));
            }
        }
    }

    built[ROOT].take().expect("root emitted last")
}

/// Position of the terminator this edge must be cut at, if any.
///
/// An edge legitimately ends *at* a terminator (leaf edges do); only a
/// terminator strictly before the last label symbol makes the edge cross a
/// document boundary.
fn truncation(
    edge: &GraphEdge,
    graph: &Graph,
    text: &[u8],
    truncate_at: Option<u8>,
) -> Option<usize> {
    let terminator = truncate_at?;
    let interior = &text[edge.start..edge.start + graph.edge_len(edge) - 1];
    memchr(terminator, interior).map(|offset| edge.start + offset)
}
