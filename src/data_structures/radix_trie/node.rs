// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node implementation for the radix trie.

use super::arena::NodeId;
use super::children::ChildrenIndex;
use super::config::IndexSettings;
use super::error::RadixTrieResult;
use super::granularity::Granularity;
use super::label::Label;

/// A node in the radix trie.
#[derive(Debug)]
pub(crate) struct TrieNode<G: Granularity> {
    /// Units consumed when crossing into this node.
    pub label: G::Label,

    /// Whether a stored name ends at the end of this node's label.
    pub terminal: bool,

    /// Children keyed by the first unit of their label.
    pub children: G::Children,

    /// Back-reference to the parent; `None` only for the root.
    pub parent: Option<NodeId>,
}

impl<G: Granularity> TrieNode<G> {
    pub fn new(
        label: G::Label,
        terminal: bool,
        parent: Option<NodeId>,
        settings: &IndexSettings,
    ) -> Self {
        Self {
            label,
            terminal,
            children: G::Children::with_settings(settings),
            parent,
        }
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Compression rule for a non-root node: a non-terminal node must branch.
    pub fn is_compressed(&self) -> bool {
        self.terminal || self.children.len() >= 2
    }
}

/// Read-only view of a node handed out by the trie.
#[derive(Debug)]
pub struct NodeView<'a, G: Granularity> {
    id: NodeId,
    node: &'a TrieNode<G>,
}

impl<'a, G: Granularity> Clone for NodeView<'a, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, G: Granularity> Copy for NodeView<'a, G> {}

impl<'a, G: Granularity> NodeView<'a, G> {
    pub(crate) fn new(id: NodeId, node: &'a TrieNode<G>) -> Self {
        Self { id, node }
    }

    /// Handle of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Label of the node.
    pub fn label(&self) -> &'a G::Label {
        &self.node.label
    }

    /// Number of units in the label.
    pub fn label_len(&self) -> usize {
        self.node.label.len()
    }

    /// Whether a stored name ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.node.terminal
    }

    /// Parent handle; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    /// Slots allocated by the children index.
    pub fn index_capacity(&self) -> usize {
        self.node.children.capacity()
    }

    /// Child handles, in index order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + 'a {
        self.node.children.entries().map(|(_, child)| child)
    }

    /// Child keyed by `unit`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RadixTrieError::HashCollision` if the index holds a different
    /// unit under the same hash key.
    pub fn child(&self, unit: &G::Unit) -> RadixTrieResult<Option<NodeId>> {
        self.node.children.get(unit)
    }
}
