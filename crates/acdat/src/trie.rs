//! Ephemeral keyword trie used during construction
//!
//! Nodes live in an arena addressed by dense integer ids, so failure links
//! are plain index fields rather than ownership edges. The whole structure
//! is discarded once the double array is packed.

use std::collections::BTreeMap;

/// Arena index of a trie node.
pub(crate) type NodeId = usize;

/// The root node always occupies arena slot 0.
pub(crate) const ROOT: NodeId = 0;

/// One trie node: prefix depth, ordered children, emitted keyword indices.
///
/// Children are keyed by character in a `BTreeMap` so sibling groups are
/// iterated in character order on every build; the double-array layout
/// depends on this determinism.
#[derive(Debug)]
pub(crate) struct TrieNode {
    /// Distance from the root (root = 0).
    pub depth: usize,
    /// Outgoing transitions, iterated in character order.
    pub children: BTreeMap<char, NodeId>,
    /// Keyword indices ending exactly here, kept as a descending-order set.
    emits: Vec<u32>,
    /// Failure node id, root until recomputed by the builder.
    pub fail: NodeId,
    /// Slot assigned in the double array during packing.
    pub position: usize,
}

impl TrieNode {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            children: BTreeMap::new(),
            emits: Vec::new(),
            fail: ROOT,
            position: 0,
        }
    }
}

/// Mutable prefix tree over the keyword set.
#[derive(Debug)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(0)],
        }
    }

    /// Walk/extend the trie along `keyword`, creating nodes as needed, and
    /// record `index` on the terminal node. Returns the keyword's length in
    /// characters. Duplicate keywords stack their indices on the same node.
    pub fn insert(&mut self, keyword: &str, index: u32) -> usize {
        let mut current = ROOT;
        let mut length = 0;
        for ch in keyword.chars() {
            length += 1;
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    let depth = self.nodes[current].depth + 1;
                    self.nodes.push(TrieNode::new(depth));
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }
        self.add_emit(current, index);
        length
    }

    /// Insert `index` into the node's descending-order emit set.
    pub fn add_emit(&mut self, id: NodeId, index: u32) {
        let emits = &mut self.nodes[id].emits;
        if let Err(at) = emits.binary_search_by(|probe| probe.cmp(&index).reverse()) {
            emits.insert(at, index);
        }
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut TrieNode {
        &mut self.nodes[id]
    }

    /// Child of `id` on `ch`, with no root fallback.
    pub fn child(&self, id: NodeId, ch: char) -> Option<NodeId> {
        self.nodes[id].children.get(&ch).copied()
    }

    pub fn emits(&self, id: NodeId) -> &[u32] {
        &self.nodes[id].emits
    }

    /// Largest keyword index ending at `id`, if this node terminates a
    /// keyword. The root never qualifies, even when it carries the empty
    /// keyword's emit: its slot is fixed and needs no synthetic leaf.
    pub fn terminal_emit(&self, id: NodeId) -> Option<u32> {
        let node = &self.nodes[id];
        if node.depth > 0 {
            node.emits.first().copied()
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
