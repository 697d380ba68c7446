use crate::code_table::CodeTable;
use crate::decoder::Decoder;
use crate::error::{Error, Result};
use crate::node::{Node, NodeKey};
use crate::view::{NodeRef, TreeNode};
use ahash::AHashMap as HashMap;
use slotmap::SlotMap;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// An immutable Huffman tree.
///
/// Leaves hold symbols and their counts, internal nodes hold only the summed
/// frequency of their two children. Nodes live in a generational arena and
/// reference their children by key.
///
/// # Tie-breaking
///
/// Every node entering the priority queue gets a sequence number: leaves are
/// numbered in insertion order, merged nodes continue the count. When two
/// nodes have the same frequency the one with the lower number is popped
/// first. The first node popped becomes the left child.
#[derive(Debug, Clone)]
pub struct HuffmanTree<T> {
    pub(crate) nodes: SlotMap<NodeKey, Node<T>>,
    pub(crate) root: NodeKey,
    symbols: usize,
}

/// Priority queue entry. Ordered so `BinaryHeap` pops the lowest frequency,
/// then the lowest sequence number.
#[derive(Debug)]
struct QueueEntry {
    frequency: u64,
    seq: u64,
    key: NodeKey,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-priority queue
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Hash + Eq + Clone> HuffmanTree<T> {
    /// Builds a tree from `(symbol, count)` pairs.
    ///
    /// Iteration order is the insertion order used for tie-breaking, so pass
    /// an ordered collection when reproducible codes matter. A symbol listed
    /// more than once has its counts summed and keeps its first position.
    ///
    /// Fails with [`Error::InvalidInput`] if there are no pairs or the total
    /// count overflows `u64`.
    pub fn from_frequencies<I>(frequencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut index: HashMap<T, usize> = HashMap::new();
        let mut counts: Vec<(T, u64)> = Vec::new();

        for (symbol, frequency) in frequencies {
            match index.entry(symbol) {
                Entry::Occupied(e) => {
                    let slot = &mut counts[*e.get()].1;
                    *slot = slot.checked_add(frequency).ok_or_else(overflow)?;
                }
                Entry::Vacant(e) => {
                    counts.push((e.key().clone(), frequency));
                    e.insert(counts.len() - 1);
                }
            }
        }

        if counts.is_empty() {
            return Err(Error::InvalidInput(
                "frequency mapping is empty".to_string(),
            ));
        }

        Self::build(counts)
    }

    /// Counts the symbols of a sequence and builds a tree from the counts.
    ///
    /// Symbols are inserted in order of first appearance.
    /// Fails with [`Error::InvalidInput`] if the sequence is empty.
    pub fn from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut index: HashMap<T, usize> = HashMap::new();
        let mut counts: Vec<(T, u64)> = Vec::new();

        for symbol in symbols {
            match index.entry(symbol) {
                Entry::Occupied(e) => counts[*e.get()].1 += 1,
                Entry::Vacant(e) => {
                    counts.push((e.key().clone(), 1));
                    e.insert(counts.len() - 1);
                }
            }
        }

        if counts.is_empty() {
            return Err(Error::InvalidInput("symbol sequence is empty".to_string()));
        }

        Self::build(counts)
    }

    /// Merges the two lowest-frequency nodes until one remains.
    ///
    /// `counts` holds distinct symbols in insertion order.
    fn build(counts: Vec<(T, u64)>) -> Result<Self> {
        counts
            .iter()
            .try_fold(0u64, |acc, (_, f)| acc.checked_add(*f))
            .ok_or_else(overflow)?;

        let symbols = counts.len();
        let mut nodes = SlotMap::with_capacity_and_key(symbols * 2);
        let mut heap = BinaryHeap::with_capacity(symbols);

        for (seq, (symbol, frequency)) in counts.into_iter().enumerate() {
            let key = nodes.insert(Node::Leaf { frequency, symbol });
            heap.push(QueueEntry {
                frequency,
                seq: seq as u64,
                key,
            });
        }

        let mut next_seq = symbols as u64;
        let root = loop {
            let left = match heap.pop() {
                Some(left) => left,
                None => {
                    return Err(Error::InvalidInput(
                        "frequency mapping is empty".to_string(),
                    ))
                }
            };

            let right = match heap.pop() {
                Some(right) => right,
                None => break left.key,
            };

            // Cannot overflow: bounded by the checked total.
            let frequency = left.frequency + right.frequency;
            let key = nodes.insert(Node::Internal {
                frequency,
                left: left.key,
                right: right.key,
            });
            heap.push(QueueEntry {
                frequency,
                seq: next_seq,
                key,
            });
            next_seq += 1;
        };

        let tree = Self {
            nodes,
            root,
            symbols,
        };

        tracing::debug!(
            symbols,
            total = tree.total_frequency(),
            depth = tree.depth(),
            "built huffman tree"
        );

        Ok(tree)
    }

    /// Derives the code table for this tree.
    pub fn code_table(&self) -> CodeTable<T> {
        CodeTable::from_tree(self)
    }

    /// Returns the leaf counts in depth-first order, left before right.
    pub fn frequencies(&self) -> Vec<(T, u64)> {
        let mut out = Vec::with_capacity(self.symbols);
        let mut stack = vec![self.root];

        while let Some(key) = stack.pop() {
            match &self.nodes[key] {
                Node::Leaf { frequency, symbol } => out.push((symbol.clone(), *frequency)),
                Node::Internal { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }

        out
    }

    /// Copies the tree into an owned recursive structure for export.
    pub fn to_tree_node(&self) -> TreeNode<T> {
        TreeNode::from(self.root())
    }
}

impl<T> HuffmanTree<T> {
    /// Number of distinct symbols (leaves).
    pub fn len(&self) -> usize {
        self.symbols
    }

    /// Always false; a tree has at least one symbol.
    pub fn is_empty(&self) -> bool {
        self.symbols == 0
    }

    /// True when the tree is a lone leaf.
    pub fn is_single_symbol(&self) -> bool {
        self.nodes[self.root].is_leaf()
    }

    /// Frequency of the root, equal to the total input count.
    pub fn total_frequency(&self) -> u64 {
        self.nodes[self.root].frequency()
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((key, depth)) = stack.pop() {
            match &self.nodes[key] {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }

        max
    }

    /// Borrowed view of the root node.
    pub fn root(&self) -> NodeRef<'_, T> {
        NodeRef::new(self, self.root)
    }

    /// Starts an independent decode session positioned at the root.
    pub fn decoder(&self) -> Decoder<'_, T> {
        Decoder::new(self)
    }

    /// Advances `cursor` by one bit.
    ///
    /// Returns the new cursor and the symbol if a leaf was reached. Reaching
    /// a leaf moves the cursor back to the root. On a single-leaf tree the
    /// cursor stays put and every bit yields the lone symbol.
    pub(crate) fn step(&self, cursor: NodeKey, bit: bool) -> (NodeKey, Option<&T>) {
        match &self.nodes[cursor] {
            Node::Leaf { symbol, .. } => (cursor, Some(symbol)),
            Node::Internal { left, right, .. } => {
                let next = if bit { *right } else { *left };
                match &self.nodes[next] {
                    Node::Leaf { symbol, .. } => (self.root, Some(symbol)),
                    Node::Internal { .. } => (next, None),
                }
            }
        }
    }
}

fn overflow() -> Error {
    Error::InvalidInput("total frequency overflows u64".to_string())
}
