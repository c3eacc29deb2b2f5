// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Compressed Name Trie Implementation
//!
//! A radix (Patricia) trie over hierarchical, `/`-delimited names such as
//! `/ndn/uofa/cs/department`. One engine serves three granularities that
//! differ only in the atomic comparison unit:
//!
//! * [`BitTrie`] compares bits and branches through a two-slot index.
//! * [`ByteTrie`] compares bytes and branches through a hashed index.
//! * [`ComponentTrie`] compares whole components and branches through a hashed index.
//!
//! The trie stays maximally compressed: every non-root node either ends a
//! stored name or has at least two children, and siblings never share the
//! first unit of their labels. Inserts split nodes on partial matches and
//! removals merge them back.
//!
//! # Example
//!
//! ```
//! use trie_granularity_lib::data_structures::radix_trie::{ComponentTrie, LookupMode};
//!
//! let mut trie = ComponentTrie::new();
//! trie.insert("/ndn/uofa/cs").unwrap();
//! trie.insert("/ndn/uofa/ece").unwrap();
//!
//! assert!(trie.contains("/ndn/uofa/cs").unwrap());
//! assert!(!trie.contains("/ndn/uofa").unwrap());
//! assert!(trie.lookup("/ndn/uofa/cs/pub", LookupMode::LongestPrefix).unwrap().is_some());
//! ```

mod arena;
mod children;
pub mod config;
mod error;
mod granularity;
mod hash;
mod hashed;
mod insert;
mod label;
mod lookup;
mod node;
mod remove;
mod visit;

use serde::Serialize;
use tracing::error;

pub use arena::NodeId;
pub use children::{BinaryIndex, ChildrenIndex, SlotOutcome};
pub use config::{IndexSettings, RadixTrieConfig};
pub use error::{RadixTrieError, RadixTrieResult};
pub use granularity::{BitGranularity, ByteGranularity, ComponentGranularity, Granularity, DELIMITER};
pub use hash::{unit_hash, SeededFnvBuilder};
pub use hashed::HashedIndex;
pub use insert::InsertOutcome;
pub use label::{BitLabel, ByteLabel, ComponentLabel, Label};
pub use lookup::{LookupMode, PathStep, TriePath};
pub use node::NodeView;
pub use remove::RemoveOutcome;
pub use visit::{TrieStats, TrieVisitor};

use arena::NodeArena;
use node::TrieNode;

use crate::error::{report_error, ErrorContext, TrieGranularityError};

/// Trie comparing names bit by bit.
pub type BitTrie = RadixTrie<BitGranularity>;

/// Trie comparing names byte by byte.
pub type ByteTrie = RadixTrie<ByteGranularity>;

/// Trie comparing names component by component.
pub type ComponentTrie = RadixTrie<ComponentGranularity>;

/// Counters maintained by the mutating operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrieCounters {
    /// Names newly inserted.
    pub inserts: u64,
    /// Inserts of names already present.
    pub duplicate_inserts: u64,
    /// Names removed.
    pub removals: u64,
    /// Nodes split on a partial match.
    pub splits: u64,
    /// Nodes absorbed into their parent.
    pub merges: u64,
    /// Merges performed above the node a removal touched.
    pub cascaded_merges: u64,
}

/// Compressed trie of hierarchical names.
///
/// Mutation takes `&mut self`; share a trie across threads behind a lock.
#[derive(Debug)]
pub struct RadixTrie<G: Granularity> {
    nodes: NodeArena<TrieNode<G>>,
    root: NodeId,
    len: usize,
    config: RadixTrieConfig,
    index_settings: IndexSettings,
    max_height: usize,
    counters: TrieCounters,
}

impl<G: Granularity> RadixTrie<G> {
    /// Creates an empty trie with the default configuration.
    pub fn new() -> Self {
        Self::build(RadixTrieConfig::default())
    }

    /// Creates an empty trie with the specified configuration.
    ///
    /// # Errors
    ///
    /// Returns `RadixTrieError::InvalidConfiguration` if `config` is rejected.
    pub fn with_config(config: RadixTrieConfig) -> RadixTrieResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RadixTrieConfig) -> Self {
        let index_settings = config.index_settings();
        let max_height = config
            .max_height
            .unwrap_or_else(|| G::max_key_units(&config) + 1);
        let (nodes, root) =
            NodeArena::with_first(TrieNode::new(G::root_label(), false, None, &index_settings));
        Self {
            nodes,
            root,
            len: 0,
            config,
            index_settings,
            max_height,
            counters: TrieCounters::default(),
        }
    }

    /// Number of stored names.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no name is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Handle of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The configuration the trie was built with.
    pub fn config(&self) -> &RadixTrieConfig {
        &self.config
    }

    /// Effective maximum height.
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Operation counters.
    pub fn counters(&self) -> TrieCounters {
        self.counters
    }

    /// Read-only view of a node; `None` for a stale handle.
    pub fn node(&self, id: NodeId) -> Option<NodeView<'_, G>> {
        self.nodes.get(id).map(|node| NodeView::new(id, node))
    }

    /// Removes every name, keeping only the root.
    pub fn clear(&mut self) {
        self.nodes.retain_only(self.root);
        if let Some(root) = self.nodes.get_mut(self.root) {
            root.children = G::Children::with_settings(&self.index_settings);
            root.terminal = false;
        }
        self.len = 0;
    }

    /// Rebuilds the full name ending at `id`.
    ///
    /// Returns `None` for a stale handle.
    pub fn name_of(&self, id: NodeId) -> Option<String> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            chain.push(node_id);
            current = node.parent;
            if chain.len() > self.max_height + 1 {
                return None;
            }
        }

        let mut label = G::Label::default();
        for node_id in chain.iter().rev() {
            label.append(&self.nodes.get(*node_id)?.label);
        }
        Some(G::render(&label))
    }

    fn entry(&self, id: NodeId) -> RadixTrieResult<&TrieNode<G>> {
        self.nodes
            .get(id)
            .ok_or_else(|| RadixTrieError::corrupted(format!("dangling node reference {id}")))
    }

    fn entry_mut(&mut self, id: NodeId) -> RadixTrieResult<&mut TrieNode<G>> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| RadixTrieError::corrupted(format!("dangling node reference {id}")))
    }

    fn check_height(&self, depth: usize) -> RadixTrieResult<()> {
        if depth > self.max_height {
            return Err(RadixTrieError::MaxHeightExceeded {
                max_height: self.max_height,
            });
        }
        Ok(())
    }

    /// Checks that the child reached through `unit` really starts with it.
    fn check_first_unit(&self, id: NodeId, node: &TrieNode<G>, unit: &G::Unit) -> RadixTrieResult<()> {
        if node.label.is_empty() || node.label.unit(0) != *unit {
            return Err(RadixTrieError::corrupted(format!(
                "node {id} is indexed by {unit:?} but its label does not start with it"
            )));
        }
        Ok(())
    }

    /// Logs and reports structural errors before handing them back.
    fn escalate<T>(&self, result: RadixTrieResult<T>, operation: &'static str) -> RadixTrieResult<T> {
        if let Err(err) = &result {
            if err.is_structural() {
                error!(
                    granularity = G::NAME,
                    operation,
                    error = %err,
                    "Structural corruption detected"
                );
                report_error(
                    ErrorContext::new(
                        TrieGranularityError::Trie(err.clone()),
                        format!("radix_trie::{operation}"),
                    )
                    .with_details(format!("{} trie holding {} names", G::NAME, self.len))
                    .with_span_trace(),
                );
            }
        }
        result
    }
}

impl<G: Granularity> Default for RadixTrie<G> {
    fn default() -> Self {
        Self::new()
    }
}
