use slotmap::new_key_type;

new_key_type! {
    /// Key of a node in the tree arena.
    pub(crate) struct NodeKey;
}

/// Node types in the Huffman tree.
///
/// Children are arena keys rather than boxes so a decoder cursor can point
/// into the tree without owning any part of it.
#[derive(Debug, Clone)]
pub(crate) enum Node<T> {
    /// A symbol and its input count.
    Leaf { frequency: u64, symbol: T },

    /// A merge of two subtrees. `frequency` is the sum of both children.
    Internal {
        frequency: u64,
        left: NodeKey,
        right: NodeKey,
    },
}

impl<T> Node<T> {
    pub(crate) fn frequency(&self) -> u64 {
        match self {
            Node::Leaf { frequency, .. } | Node::Internal { frequency, .. } => *frequency,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
