// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Insert engine.

use tracing::trace;

use super::arena::NodeId;
use super::children::{ChildrenIndex, SlotOutcome};
use super::error::{RadixTrieError, RadixTrieResult};
use super::granularity::Granularity;
use super::label::Label;
use super::node::TrieNode;
use super::RadixTrie;

/// Result of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The name was added and ends at the contained node.
    Inserted(NodeId),
    /// The name was already stored at the contained node; the trie is unchanged.
    AlreadyPresent(NodeId),
}

impl InsertOutcome {
    /// Node where the name ends.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Inserted(id) | Self::AlreadyPresent(id) => *id,
        }
    }

    /// Returns true if the trie changed.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

impl<G: Granularity> RadixTrie<G> {
    /// Inserts a name.
    ///
    /// # Arguments
    ///
    /// * `name` - A `/`-prefixed hierarchical name.
    ///
    /// # Returns
    ///
    /// * `Ok(InsertOutcome::Inserted(id))` - The name was added.
    /// * `Ok(InsertOutcome::AlreadyPresent(id))` - The name was already stored.
    /// * `Err(RadixTrieError)` - The name is malformed, or the trie is corrupted.
    pub fn insert(&mut self, name: &str) -> RadixTrieResult<InsertOutcome> {
        let key = G::split_key(name, &self.config)?;
        let result = self.insert_key(&key);
        self.escalate(result, "insert")
    }

    fn insert_key(&mut self, key: &G::Label) -> RadixTrieResult<InsertOutcome> {
        let mut parent = self.root;
        let mut offset = 0;
        let mut depth = 0;

        loop {
            let unit = key.unit(offset);
            let next = self.entry(parent)?.children.get(&unit)?;
            let Some(child) = next else {
                self.check_height(depth + 1)?;
                let leaf = self.attach_leaf(parent, key.suffix(offset))?;
                return Ok(self.record_insert(leaf));
            };

            depth += 1;
            self.check_height(depth)?;

            let node = self.entry(child)?;
            self.check_first_unit(child, node, &unit)?;
            let label_len = node.label.len();
            let matched = node.label.common_prefix_len(key, offset);
            offset += matched;

            if matched < label_len {
                self.check_split_height(child, depth)?;
                let internal = self.split(parent, child, &unit, matched)?;
                if offset == key.len() {
                    self.entry_mut(internal)?.terminal = true;
                    return Ok(self.record_insert(internal));
                }
                let leaf = self.attach_leaf(internal, key.suffix(offset))?;
                return Ok(self.record_insert(leaf));
            }

            if offset == key.len() {
                let node = self.entry_mut(child)?;
                if node.terminal {
                    self.counters.duplicate_inserts += 1;
                    return Ok(InsertOutcome::AlreadyPresent(child));
                }
                node.terminal = true;
                return Ok(self.record_insert(child));
            }

            parent = child;
        }
    }

    /// Checks that splitting `child`, found at `depth`, keeps its whole
    /// subtree within the height guard once it sits one level lower.
    fn check_split_height(&self, child: NodeId, depth: usize) -> RadixTrieResult<()> {
        self.check_height(depth + 1)?;
        // Depth never exceeds the key units consumed, so a looser guard always holds.
        if self.max_height >= G::max_key_units(&self.config) {
            return Ok(());
        }

        let mut stack = vec![(child, depth + 1)];
        while let Some((id, level)) = stack.pop() {
            self.check_height(level)?;
            stack.extend(
                self.entry(id)?
                    .children
                    .entries()
                    .map(|(_, grandchild)| (grandchild, level + 1)),
            );
        }
        Ok(())
    }

    fn record_insert(&mut self, id: NodeId) -> InsertOutcome {
        self.len += 1;
        self.counters.inserts += 1;
        InsertOutcome::Inserted(id)
    }

    /// Hangs a fresh terminal leaf carrying `label` under `parent`.
    fn attach_leaf(&mut self, parent: NodeId, label: G::Label) -> RadixTrieResult<NodeId> {
        let unit = label.unit(0);
        let leaf = self
            .nodes
            .alloc(TrieNode::new(label, true, Some(parent), &self.index_settings))?;

        let outcome = match self.entry_mut(parent) {
            Ok(node) => node.children.insert(unit.clone(), leaf),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(SlotOutcome::Inserted) => {
                trace!(granularity = G::NAME, %parent, %leaf, "Attached leaf");
                Ok(leaf)
            }
            Ok(SlotOutcome::AlreadyPresent(existing)) => {
                self.nodes.remove(leaf);
                Err(RadixTrieError::corrupted(format!(
                    "node {parent} already has child {existing} for {unit:?}"
                )))
            }
            Err(err) => {
                self.nodes.remove(leaf);
                Err(err)
            }
        }
    }

    /// Splits `child` after `at` matched units.
    ///
    /// `child` keeps its id, its children and its terminal flag and is left
    /// holding the unmatched suffix. A new internal node takes the matched
    /// prefix and replaces `child` in the parent's index.
    fn split(
        &mut self,
        parent: NodeId,
        child: NodeId,
        unit: &G::Unit,
        at: usize,
    ) -> RadixTrieResult<NodeId> {
        let mut prefix = self.entry(child)?.label.clone();
        let suffix = prefix.split_off(at);

        let mut internal = TrieNode::<G>::new(prefix, false, Some(parent), &self.index_settings);
        internal.children.insert(suffix.unit(0), child)?;
        let internal_id = self.nodes.alloc(internal)?;

        let replaced = match self.entry_mut(parent) {
            Ok(node) => node.children.replace(unit, internal_id),
            Err(err) => Err(err),
        };
        match replaced {
            Ok(previous) if previous == child => {}
            Ok(previous) => {
                self.entry_mut(parent)?.children.replace(unit, previous)?;
                self.nodes.remove(internal_id);
                return Err(RadixTrieError::corrupted(format!(
                    "split of {child} found {previous} in its parent slot"
                )));
            }
            Err(err) => {
                self.nodes.remove(internal_id);
                return Err(err);
            }
        }

        let node = self.entry_mut(child)?;
        node.label = suffix;
        node.parent = Some(internal_id);
        self.counters.splits += 1;
        trace!(granularity = G::NAME, %child, internal = %internal_id, at, "Split node");
        Ok(internal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{BitTrie, ByteTrie, ComponentTrie, LookupMode, RadixTrieConfig};
    use super::*;

    #[test]
    fn test_insert_fresh_leaf_under_root() {
        let mut trie = ComponentTrie::new();
        let id = trie.insert("/ndn/uofa").unwrap().node();

        let node = trie.node(id).unwrap();
        assert!(node.is_terminal());
        assert_eq!(node.label_len(), 2);
        assert_eq!(node.parent(), Some(trie.root()));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut trie = ByteTrie::new();
        let first = trie.insert("/ndn/uofa").unwrap();
        let nodes = trie.node_count();

        let second = trie.insert("/ndn/uofa").unwrap();
        assert_eq!(second, InsertOutcome::AlreadyPresent(first.node()));
        assert!(!second.is_inserted());
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.counters().duplicate_inserts, 1);
    }

    #[test]
    fn test_split_keeps_old_node_as_suffix() {
        let mut trie = ComponentTrie::new();
        let old = trie.insert("/ndn/uofa/cs").unwrap().node();
        let leaf = trie.insert("/ndn/uofa/ece").unwrap().node();

        let old_view = trie.node(old).unwrap();
        assert_eq!(old_view.label().components().len(), 1);
        assert!(old_view.is_terminal());

        let internal = old_view.parent().unwrap();
        let internal_view = trie.node(internal).unwrap();
        assert!(!internal_view.is_terminal());
        assert_eq!(internal_view.child_count(), 2);
        assert_eq!(internal_view.parent(), Some(trie.root()));
        assert_eq!(trie.node(leaf).unwrap().parent(), Some(internal));
        assert_eq!(trie.name_of(internal).unwrap(), "/ndn/uofa");
        assert_eq!(trie.counters().splits, 1);
        trie.validate().unwrap();
    }

    #[test]
    fn test_split_with_key_exhausted_inside_label() {
        let mut trie = ByteTrie::new();
        trie.insert("/abc").unwrap();
        let id = trie.insert("/ab").unwrap().node();

        let node = trie.node(id).unwrap();
        assert!(node.is_terminal());
        assert_eq!(node.child_count(), 1);
        assert_eq!(node.label().as_bytes(), b"ab");
        assert!(trie.contains("/abc").unwrap());
        assert!(trie.contains("/ab").unwrap());
        trie.validate().unwrap();
    }

    #[test]
    fn test_prefix_then_extension() {
        let mut trie = ComponentTrie::new();
        let parent = trie.insert("/a/b").unwrap().node();
        let child = trie.insert("/a/b/c").unwrap().node();

        assert_eq!(trie.node(child).unwrap().parent(), Some(parent));
        assert!(trie.contains("/a/b").unwrap());
        assert!(trie.contains("/a/b/c").unwrap());
        assert_eq!(trie.lookup("/a", LookupMode::Exact).unwrap(), None);
    }

    #[test]
    fn test_bit_split_inside_byte() {
        let mut trie = BitTrie::new();
        // 'a' = 0110_0001 and 'c' = 0110_0011 diverge at bit 6
        trie.insert("/a").unwrap();
        let c = trie.insert("/c").unwrap().node();

        let internal = trie.node(c).unwrap().parent().unwrap();
        assert_eq!(trie.node(internal).unwrap().label_len(), 6);
        assert_eq!(trie.node(c).unwrap().label_len(), 2);
        trie.validate().unwrap();
    }

    #[test]
    fn test_leaf_past_height_guard_is_rejected() {
        let config = RadixTrieConfig::new().with_max_height(2);
        let mut trie = ComponentTrie::with_config(config).unwrap();
        trie.insert("/a/b").unwrap();
        trie.insert("/a/c").unwrap();
        let nodes = trie.node_count();

        let err = trie.insert("/a/c/d").unwrap_err();
        assert_eq!(err, RadixTrieError::MaxHeightExceeded { max_height: 2 });
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.node_count(), nodes);
        assert!(!trie.contains("/a/c/d").unwrap());
        assert!(trie.contains("/a/c").unwrap());
        trie.validate().unwrap();
    }

    #[test]
    fn test_split_pushing_subtree_past_height_guard_is_rejected() {
        let config = RadixTrieConfig::new().with_max_height(2);
        let mut trie = ComponentTrie::with_config(config).unwrap();
        trie.insert("/a/b/c").unwrap();
        trie.insert("/a/b/c/d").unwrap();
        let nodes = trie.node_count();

        let err = trie.insert("/a/x").unwrap_err();
        assert_eq!(err, RadixTrieError::MaxHeightExceeded { max_height: 2 });
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.node_count(), nodes);
        assert_eq!(trie.counters().splits, 0);
        assert!(trie.contains("/a/b/c/d").unwrap());
        assert!(!trie.contains("/a/x").unwrap());
        trie.validate().unwrap();
    }

    #[test]
    fn test_split_within_height_guard() {
        let config = RadixTrieConfig::new().with_max_height(3);
        let mut trie = ComponentTrie::with_config(config).unwrap();
        trie.insert("/a/b/c").unwrap();
        trie.insert("/a/b/c/d").unwrap();

        assert!(trie.insert("/a/x").unwrap().is_inserted());
        assert!(trie.contains("/a/b/c/d").unwrap());
        assert!(trie.contains("/a/x").unwrap());
        assert_eq!(trie.stats().max_depth, 3);
        trie.validate().unwrap();
    }

    #[test]
    fn test_malformed_names_leave_trie_unchanged() {
        let mut trie = ComponentTrie::new();
        trie.insert("/ndn").unwrap();

        assert!(trie.insert("ndn").unwrap_err().is_malformed_input());
        assert!(trie.insert("/").unwrap_err().is_malformed_input());
        assert!(trie.insert("//").unwrap_err().is_malformed_input());
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), 2);
    }
}
