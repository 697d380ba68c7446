//! Read-only views of a built tree for rendering and serialization.

use crate::node::{Node, NodeKey};
use crate::tree::HuffmanTree;

/// A borrowed handle to one node of a [`HuffmanTree`].
pub struct NodeRef<'a, T> {
    tree: &'a HuffmanTree<T>,
    key: NodeKey,
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(tree: &'a HuffmanTree<T>, key: NodeKey) -> Self {
        Self { tree, key }
    }

    fn node(&self) -> &'a Node<T> {
        &self.tree.nodes[self.key]
    }

    /// The leaf's symbol, or `None` for internal nodes.
    pub fn symbol(&self) -> Option<&'a T> {
        match self.node() {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    pub fn frequency(&self) -> u64 {
        self.node().frequency()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Child reached by bit 0.
    pub fn left(&self) -> Option<Self> {
        match self.node() {
            Node::Internal { left, .. } => Some(Self::new(self.tree, *left)),
            Node::Leaf { .. } => None,
        }
    }

    /// Child reached by bit 1.
    pub fn right(&self) -> Option<Self> {
        match self.node() {
            Node::Internal { right, .. } => Some(Self::new(self.tree, *right)),
            Node::Leaf { .. } => None,
        }
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("symbol", &self.symbol())
            .field("frequency", &self.frequency())
            .finish()
    }
}

/// Owned, recursive copy of a tree.
///
/// Internal nodes have no symbol and two children; leaves have a symbol and
/// no children.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode<T> {
    pub symbol: Option<T>,
    pub frequency: u64,
    pub left: Option<Box<TreeNode<T>>>,
    pub right: Option<Box<TreeNode<T>>>,
}

impl<T: Clone> From<NodeRef<'_, T>> for TreeNode<T> {
    fn from(node: NodeRef<'_, T>) -> Self {
        TreeNode {
            symbol: node.symbol().cloned(),
            frequency: node.frequency(),
            left: node.left().map(|n| Box::new(TreeNode::from(n))),
            right: node.right().map(|n| Box::new(TreeNode::from(n))),
        }
    }
}
