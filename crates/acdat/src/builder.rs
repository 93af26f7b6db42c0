//! Automaton construction: double-array packing and failure-link BFS
//!
//! Construction runs in three steps over the ephemeral [`Trie`]:
//!
//! 1. **Packing** — every sibling group (a node's children, plus a synthetic
//!    zero-offset leaf when the node itself ends a keyword) is placed into
//!    the shared `base`/`check` arrays. Placement is queue-driven rather
//!    than recursive so stack depth never tracks keyword length.
//! 2. **Failure links** — breadth-first traversal computes each state's
//!    longest-proper-suffix state and merges output sets along the way.
//! 3. **Trim** — the arrays are cut down to the exact used size and the trie
//!    is dropped.

use std::collections::VecDeque;

use crate::automaton::Automaton;
use crate::error::{AcdatError, Result};
use crate::trie::{NodeId, Trie, ROOT};

/// Slots allocated when the first sibling group is placed.
const INITIAL_CAPACITY: usize = 65_536;

/// Hard ceiling on the transition table. Growing past this returns
/// [`AcdatError::ResourceLimitExceeded`] instead of exhausting memory on
/// pathological dictionaries.
const MAX_CAPACITY: usize = 1 << 30;

/// Occupancy ratio above which the free-slot search frontier is advanced.
const OCCUPANCY_THRESHOLD: f64 = 0.95;

/// Incremental builder for an [`Automaton`].
///
/// Keywords are assigned dense indices in insertion order; that order
/// decides how co-terminating matches are reported. Duplicate keywords are
/// allowed and co-exist as separate outputs.
///
/// # Example
///
/// ```
/// use acdat::AutomatonBuilder;
///
/// let mut builder = AutomatonBuilder::new();
/// builder.insert("he", "pronoun");
/// builder.insert("hers", "possessive");
/// let automaton = builder.build()?;
/// assert_eq!(automaton.len(), 2);
/// # Ok::<(), acdat::AcdatError>(())
/// ```
#[derive(Debug)]
pub struct AutomatonBuilder<V> {
    trie: Trie,
    lengths: Vec<u32>,
    values: Vec<V>,
}

impl<V> Default for AutomatonBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AutomatonBuilder<V> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            trie: Trie::new(),
            lengths: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add a keyword bound to `value`, returning the keyword's dense index.
    ///
    /// The empty keyword is accepted; once built it yields a zero-length
    /// match at every scanned position.
    pub fn insert(&mut self, keyword: &str, value: V) -> u32 {
        let index = self.values.len() as u32;
        let length = self.trie.insert(keyword, index);
        self.lengths.push(length as u32);
        self.values.push(value);
        index
    }

    /// Number of keywords inserted so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keyword has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pack the trie into the double array, compute failure links and
    /// outputs, and freeze the result.
    pub fn build(self) -> Result<Automaton<V>> {
        let Self {
            mut trie,
            lengths,
            values,
        } = self;

        let mut packer = Packer::new(values.len());
        packer.pack(&mut trie)?;

        let mut size = packer.size;
        if size == 0 && !values.is_empty() {
            // Only the empty keyword was inserted: keep the root slot alive
            // so its output entry has somewhere to live.
            size = 1;
            packer.resize(1)?;
            packer.base[0] = 1;
        }

        let mut base = packer.base;
        let mut check = packer.check;
        base.truncate(size);
        check.truncate(size);
        base.shrink_to_fit();
        check.shrink_to_fit();

        let mut fail = vec![0u32; size];
        let mut output = vec![Vec::new(); size];
        construct_failure_states(&mut trie, &mut fail, &mut output);

        Ok(Automaton {
            base,
            check,
            fail,
            output,
            lengths,
            values,
        })
    }
}

/// A member of a sibling group: either a real trie node or the synthetic
/// zero-offset leaf that marks its parent as a keyword terminus.
enum Child {
    Node(NodeId),
    /// Keyword index to encode as a negative terminal marker.
    Leaf(u32),
}

/// One sibling group: `(relative offset, child)` pairs in offset order.
type Siblings = Vec<(u32, Child)>;

/// Collect `parent`'s sibling group. The synthetic leaf (offset 0) carries
/// the largest keyword index ending at `parent`; real children follow at
/// offset `code(c) + 1`.
fn fetch(trie: &Trie, parent: NodeId) -> Siblings {
    let node = trie.node(parent);
    let mut siblings = Vec::with_capacity(node.children.len() + 1);
    if let Some(index) = trie.terminal_emit(parent) {
        siblings.push((0, Child::Leaf(index)));
    }
    for (&ch, &child) in &node.children {
        siblings.push((ch as u32 + 1, Child::Node(child)));
    }
    siblings
}

/// Mutable double-array state owned by the single build pass.
struct Packer {
    base: Vec<i32>,
    check: Vec<i32>,
    used: Vec<bool>,
    /// One past the highest slot written so far.
    size: usize,
    /// Rolling start position for the free-slot search.
    next_check_pos: usize,
    /// Keywords whose terminal leaf has been placed.
    progress: usize,
    key_count: usize,
}

impl Packer {
    fn new(key_count: usize) -> Self {
        Self {
            base: Vec::new(),
            check: Vec::new(),
            used: Vec::new(),
            size: 0,
            next_check_pos: 0,
            progress: 0,
            key_count,
        }
    }

    fn capacity(&self) -> usize {
        self.base.len()
    }

    /// Grow all three arrays to `new_len` slots, zero-filled.
    fn resize(&mut self, new_len: usize) -> Result<()> {
        if new_len > MAX_CAPACITY {
            return Err(AcdatError::ResourceLimitExceeded(format!(
                "transition table would need {} slots, limit is {} \
                 ({} of {} keywords placed)",
                new_len, MAX_CAPACITY, self.progress, self.key_count
            )));
        }
        self.base.resize(new_len, 0);
        self.check.resize(new_len, 0);
        self.used.resize(new_len, false);
        Ok(())
    }

    /// Place every sibling group of the trie, breadth-first. Each node's
    /// double-array slot is recorded on the node as it is placed; a parent's
    /// `base` is finalized once its children's common `begin` is known.
    fn pack(&mut self, trie: &mut Trie) -> Result<()> {
        let first = fetch(trie, ROOT);
        if first.is_empty() {
            return Ok(());
        }
        self.resize(INITIAL_CAPACITY)?;
        self.base[0] = 1;

        let mut queue: VecDeque<(usize, Siblings)> = VecDeque::new();
        queue.push_back((0, first));

        while let Some((parent_pos, siblings)) = queue.pop_front() {
            let begin = self.place(&siblings)?;
            self.used[begin] = true;

            let last_code = siblings[siblings.len() - 1].0 as usize;
            self.size = self.size.max(begin + last_code + 1);

            for &(code, _) in &siblings {
                self.check[begin + code as usize] = begin as i32;
            }
            for (code, child) in siblings {
                let slot = begin + code as usize;
                match child {
                    Child::Leaf(index) => {
                        self.base[slot] = -(index as i32) - 1;
                        self.progress += 1;
                    }
                    Child::Node(id) => {
                        trie.node_mut(id).position = slot;
                        queue.push_back((slot, fetch(trie, id)));
                    }
                }
            }
            self.base[parent_pos] = begin as i32;
        }
        Ok(())
    }

    /// Find a `begin` such that `check[begin + code] == 0` for every sibling
    /// offset at once. The scan starts from the rolling `next_check_pos`
    /// frontier; the array fills left to right with occasional gaps, so this
    /// keeps the amortized cost flat.
    fn place(&mut self, siblings: &Siblings) -> Result<usize> {
        let first_code = siblings[0].0 as usize;
        let last_code = siblings[siblings.len() - 1].0 as usize;

        let mut pos = (first_code + 1).max(self.next_check_pos) - 1;
        let mut nonzero = 0usize;
        let mut first_free_seen = false;

        let begin = loop {
            pos += 1;
            if self.capacity() <= pos {
                self.resize(pos + 1)?;
            }
            if self.check[pos] != 0 {
                nonzero += 1;
                continue;
            }
            if !first_free_seen {
                self.next_check_pos = pos;
                first_free_seen = true;
            }

            let begin = pos - first_code;
            if self.capacity() <= begin + last_code {
                // Growth adapts to observed progress: sparse dictionaries
                // grow slowly, dense ones in bigger steps.
                let factor =
                    (self.key_count as f64 / (self.progress as f64 + 1.0)).max(1.05);
                let grown = (self.capacity() as f64 * factor) as usize;
                self.resize(grown.max(begin + last_code + 1))?;
            }
            if self.used[begin] {
                continue;
            }
            if siblings[1..]
                .iter()
                .any(|&(code, _)| self.check[begin + code as usize] != 0)
            {
                continue;
            }
            break begin;
        };

        // If the scanned stretch was mostly occupied, move the frontier up
        // so later searches skip it entirely.
        let scanned = pos - self.next_check_pos + 1;
        if nonzero as f64 / scanned as f64 >= OCCUPANCY_THRESHOLD {
            self.next_check_pos = pos;
        }
        Ok(begin)
    }
}

/// Breadth-first failure-link and output construction.
///
/// Depth-1 states fail to the root; every deeper state fails to the node
/// reached by walking its parent's failure chain until a transition on the
/// same character exists (the root transitions to itself, so the walk
/// terminates). A state's output is its own emissions followed by its
/// failure state's already-constructed output; the two are disjoint because
/// a keyword terminates at exactly one node.
fn construct_failure_states(trie: &mut Trie, fail: &mut [u32], output: &mut [Vec<u32>]) {
    if output.is_empty() {
        return;
    }
    // Root emissions (the empty keyword, if present) surface at slot 0 and
    // are inherited below, so a zero-length keyword hits at every position.
    output[0] = trie.emits(ROOT).to_vec();

    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let depth_one: Vec<NodeId> = trie.node(ROOT).children.values().copied().collect();
    for id in depth_one {
        trie.node_mut(id).fail = ROOT;
        let pos = trie.node(id).position;
        fail[pos] = 0;
        output[pos] = merged_output(trie.emits(id), &output[0]);
        queue.push_back(id);
    }

    while let Some(current) = queue.pop_front() {
        let transitions: Vec<(char, NodeId)> = trie
            .node(current)
            .children
            .iter()
            .map(|(&ch, &id)| (ch, id))
            .collect();

        for (ch, target) in transitions {
            queue.push_back(target);

            let mut trace = trie.node(current).fail;
            let new_failure = loop {
                if let Some(next) = trie.child(trace, ch) {
                    break next;
                }
                if trace == ROOT {
                    break ROOT;
                }
                trace = trie.node(trace).fail;
            };

            trie.node_mut(target).fail = new_failure;
            let target_pos = trie.node(target).position;
            let failure_pos = trie.node(new_failure).position;
            fail[target_pos] = failure_pos as u32;
            // The failure state is strictly shallower, so its output entry
            // was finished in an earlier BFS layer.
            output[target_pos] = merged_output(trie.emits(target), &output[failure_pos]);
        }
    }
}

/// Own emissions first (already in descending index order), inherited
/// entries after, preserving the failure state's order.
fn merged_output(own: &[u32], inherited: &[u32]) -> Vec<u32> {
    if own.is_empty() && inherited.is_empty() {
        return Vec::new();
    }
    let mut merged = Vec::with_capacity(own.len() + inherited.len());
    merged.extend_from_slice(own);
    merged.extend_from_slice(inherited);
    merged
}
