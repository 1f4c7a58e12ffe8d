//! Node hierarchy reconstruction and the node-list checksum.
//!
//! Two wire encodings exist for the skeleton, selected by format version:
//! parent indices (8205+) or child/sibling chains (before). Reconstruction
//! derives the missing representation so every node ends up with a consistent
//! `{parent, child, sibling}` triple. A malformed graph aborts the entire
//! parse, since downstream consumers assume a valid tree.

use xxhash_rust::xxh3::xxh3_64;

use crate::error::{Error, GraphFault};
use crate::model::types::{ModelNode, NO_INDEX};

/// Which link representation the wire format carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGraphEncoding {
    /// Each node declares `parent` (newer versions). Child/sibling chains are
    /// derived; the most-recently-declared child becomes the chain head.
    ParentBased,
    /// Each node declares `child` and `sibling` (older versions). Parents are
    /// derived by walking sibling chains.
    ChildSiblingBased,
}

/// Injectable checksum over the node hierarchy.
///
/// The engine's own formula can be supplied by the host; [`node_checksum`]
/// is the default collaborator.
pub type NodeChecksumFn = fn(&[ModelNode]) -> u32;

/// Derive the missing link representation and validate the graph.
///
/// Fails with [`Error::MalformedGraph`] on out-of-range indices, self
/// references, cycles, or nodes unreachable from any root. Never hangs:
/// every walk marks visited nodes.
pub fn reconstruct_hierarchy(
    nodes: &mut [ModelNode],
    encoding: NodeGraphEncoding,
) -> Result<(), Error> {
    match encoding {
        NodeGraphEncoding::ParentBased => reconstruct_from_parents(nodes),
        NodeGraphEncoding::ChildSiblingBased => reconstruct_from_chains(nodes),
    }
}

fn index_in_range(index: i32, len: usize) -> bool {
    index == NO_INDEX || (index >= 0 && (index as usize) < len)
}

fn reconstruct_from_parents(nodes: &mut [ModelNode]) -> Result<(), Error> {
    let len = nodes.len();

    for node in nodes.iter_mut() {
        node.child = NO_INDEX;
        node.sibling = NO_INDEX;
    }

    for i in 0..len {
        let parent = nodes[i].parent;
        if parent == NO_INDEX {
            continue;
        }
        if !index_in_range(parent, len) {
            return Err(Error::MalformedGraph {
                node: i,
                reason: GraphFault::ParentOutOfRange,
            });
        }
        if parent as usize == i {
            return Err(Error::MalformedGraph {
                node: i,
                reason: GraphFault::SelfParent,
            });
        }
        // Most-recently-seen child becomes the head of the sibling chain.
        nodes[i].sibling = nodes[parent as usize].child;
        nodes[parent as usize].child = i as i32;
    }

    check_reachability(nodes)
}

fn reconstruct_from_chains(nodes: &mut [ModelNode]) -> Result<(), Error> {
    let len = nodes.len();

    for (i, node) in nodes.iter().enumerate() {
        if !index_in_range(node.child, len) {
            return Err(Error::MalformedGraph {
                node: i,
                reason: GraphFault::ChildOutOfRange,
            });
        }
        if !index_in_range(node.sibling, len) {
            return Err(Error::MalformedGraph {
                node: i,
                reason: GraphFault::SiblingOutOfRange,
            });
        }
    }

    for node in nodes.iter_mut() {
        node.parent = NO_INDEX;
    }

    // A node reached twice across all chain walks is either doubly-parented
    // or part of a cycle.
    let mut visited = vec![false; len];
    for i in 0..len {
        let mut cur = nodes[i].child;
        while cur != NO_INDEX {
            let c = cur as usize;
            if c == i || visited[c] {
                return Err(Error::MalformedGraph {
                    node: c,
                    reason: GraphFault::CycleDetected,
                });
            }
            visited[c] = true;
            nodes[c].parent = i as i32;
            cur = nodes[c].sibling;
        }
    }

    check_reachability(nodes)
}

/// Every node must be reachable from a root by child/sibling links. This is
/// what catches parent-index cycles (no member of the cycle is a root).
fn check_reachability(nodes: &[ModelNode]) -> Result<(), Error> {
    let len = nodes.len();
    let mut seen = vec![false; len];
    let mut stack: Vec<usize> = (0..len).filter(|&i| nodes[i].is_root()).collect();

    for &root in &stack {
        seen[root] = true;
    }
    while let Some(i) = stack.pop() {
        let mut cur = nodes[i].child;
        while cur != NO_INDEX {
            let c = cur as usize;
            if !seen[c] {
                seen[c] = true;
                stack.push(c);
            }
            cur = nodes[c].sibling;
        }
    }

    if let Some(lost) = seen.iter().position(|&s| !s) {
        return Err(Error::MalformedGraph {
            node: lost,
            reason: GraphFault::Unreachable,
        });
    }
    Ok(())
}

/// Default node-hierarchy checksum: xxh3 over names and tree structure in
/// traversal order (roots in declaration order, then child chains
/// depth-first). Renaming or re-parenting any node changes the value.
///
/// Callers wanting the engine's exact formula supply their own
/// [`NodeChecksumFn`] through `WriteOptions`.
pub fn node_checksum(nodes: &[ModelNode]) -> u32 {
    let mut buf: Vec<u8> = Vec::with_capacity(nodes.len() * 16);
    let mut stack: Vec<(usize, bool)> = Vec::new();

    // Roots pushed in reverse so declaration order pops first.
    for i in (0..nodes.len()).rev() {
        if nodes[i].is_root() {
            stack.push((i, false));
        }
    }

    while let Some((i, closing)) = stack.pop() {
        if closing {
            buf.push(b')');
            continue;
        }
        buf.push(b'(');
        buf.extend_from_slice(nodes[i].name.as_bytes());
        stack.push((i, true));

        let mut cur = nodes[i].child;
        while cur != NO_INDEX && (cur as usize) < nodes.len() {
            stack.push((cur as usize, false));
            cur = nodes[cur as usize].sibling;
        }
    }

    let h = xxh3_64(&buf);
    (h ^ (h >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, parent: i32, child: i32, sibling: i32) -> ModelNode {
        ModelNode {
            name: name.to_string(),
            parent,
            child,
            sibling,
        }
    }

    /// Tree: root(0) with children 1, 2; node 2 has child 3.
    fn parent_encoded() -> Vec<ModelNode> {
        vec![
            node("root", -1, -1, -1),
            node("arm", 0, -1, -1),
            node("leg", 0, -1, -1),
            node("foot", 2, -1, -1),
        ]
    }

    /// Same logical tree, child/sibling encoded. The head of each sibling
    /// chain is the most-recently-declared child (leg before arm).
    fn chain_encoded() -> Vec<ModelNode> {
        vec![
            node("root", -1, 2, -1),
            node("arm", -1, -1, -1),
            node("leg", -1, 3, 1),
            node("foot", -1, -1, -1),
        ]
    }

    #[test]
    fn test_parent_based_derives_chains() {
        let mut nodes = parent_encoded();
        reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ParentBased).unwrap();

        assert_eq!(nodes[0].child, 2); // last-declared child is chain head
        assert_eq!(nodes[2].sibling, 1);
        assert_eq!(nodes[1].sibling, -1);
        assert_eq!(nodes[2].child, 3);
        assert_eq!(nodes[3].sibling, -1);
    }

    #[test]
    fn test_chain_based_derives_parents() {
        let mut nodes = chain_encoded();
        reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ChildSiblingBased).unwrap();

        assert_eq!(nodes[0].parent, -1);
        assert_eq!(nodes[1].parent, 0);
        assert_eq!(nodes[2].parent, 0);
        assert_eq!(nodes[3].parent, 2);
    }

    #[test]
    fn test_both_encodings_yield_identical_triples() {
        let mut a = parent_encoded();
        let mut b = chain_encoded();
        reconstruct_hierarchy(&mut a, NodeGraphEncoding::ParentBased).unwrap();
        reconstruct_hierarchy(&mut b, NodeGraphEncoding::ChildSiblingBased).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parent_out_of_range() {
        let mut nodes = vec![node("root", -1, -1, -1), node("stray", 9, -1, -1)];
        let err = reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ParentBased).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                node: 1,
                reason: GraphFault::ParentOutOfRange
            }
        ));
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut nodes = vec![node("root", -1, -1, -1), node("loop", 1, -1, -1)];
        let err = reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ParentBased).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                reason: GraphFault::SelfParent,
                ..
            }
        ));
    }

    #[test]
    fn test_parent_cycle_is_unreachable() {
        // 1 and 2 parent each other; neither is a root.
        let mut nodes = vec![
            node("root", -1, -1, -1),
            node("a", 2, -1, -1),
            node("b", 1, -1, -1),
        ];
        let err = reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ParentBased).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                reason: GraphFault::Unreachable,
                ..
            }
        ));
    }

    #[test]
    fn test_sibling_cycle_detected_not_hang() {
        // Node 2's ancestor chain loops back to node 2: 0 -> child 1,
        // 1 -> sibling 2, 2 -> sibling 1 again via its own child walk.
        let mut nodes = vec![
            node("root", -1, 1, -1),
            node("a", -1, -1, 2),
            node("b", -1, 1, -1),
        ];
        let err =
            reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ChildSiblingBased).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                reason: GraphFault::CycleDetected,
                ..
            }
        ));
    }

    #[test]
    fn test_chain_child_out_of_range() {
        let mut nodes = vec![node("root", -1, 42, -1)];
        let err =
            reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ChildSiblingBased).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                node: 0,
                reason: GraphFault::ChildOutOfRange
            }
        ));
    }

    #[test]
    fn test_doubly_parented_node_detected() {
        // Both 0 and 1 claim node 2 as child.
        let mut nodes = vec![
            node("root", -1, 2, -1),
            node("other", -1, 2, -1),
            node("shared", -1, -1, -1),
        ];
        let err =
            reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ChildSiblingBased).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                node: 2,
                reason: GraphFault::CycleDetected
            }
        ));
    }

    #[test]
    fn test_checksum_deterministic_and_structure_sensitive() {
        let mut a = parent_encoded();
        reconstruct_hierarchy(&mut a, NodeGraphEncoding::ParentBased).unwrap();

        let c1 = node_checksum(&a);
        let c2 = node_checksum(&a);
        assert_eq!(c1, c2);

        let mut renamed = a.clone();
        renamed[1].name = "wing".to_string();
        assert_ne!(node_checksum(&renamed), c1);

        // Re-parent foot under arm instead of leg.
        let mut moved = vec![
            ModelNode::named("root"),
            ModelNode::named("arm"),
            ModelNode::named("leg"),
            ModelNode::named("foot"),
        ];
        moved[1].parent = 0;
        moved[2].parent = 0;
        moved[3].parent = 1;
        reconstruct_hierarchy(&mut moved, NodeGraphEncoding::ParentBased).unwrap();
        assert_ne!(node_checksum(&moved), c1);
    }

    #[test]
    fn test_empty_node_list() {
        let mut nodes: Vec<ModelNode> = vec![];
        reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ParentBased).unwrap();
        reconstruct_hierarchy(&mut nodes, NodeGraphEncoding::ChildSiblingBased).unwrap();
    }
}
