// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Remove engine.
//!
//! Removal clears the terminal flag of the node a name ends at, drops the node
//! if it became a leaf, and merges whatever node was left with a single child
//! and no name of its own back into that child.

use tracing::{trace, warn};

use super::arena::NodeId;
use super::children::ChildrenIndex;
use super::error::{RadixTrieError, RadixTrieResult};
use super::granularity::Granularity;
use super::label::Label;
use super::lookup::{LookupMode, TriePath};
use super::RadixTrie;

/// Result of a remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The name was stored and is gone.
    Removed,
    /// The name was not stored; the trie is unchanged.
    NotFound,
}

impl<G: Granularity> RadixTrie<G> {
    /// Removes a name.
    ///
    /// # Returns
    ///
    /// * `Ok(RemoveOutcome::Removed)` - The name was removed.
    /// * `Ok(RemoveOutcome::NotFound)` - The name was not stored.
    /// * `Err(RadixTrieError)` - The name is malformed, or the trie is corrupted.
    pub fn remove(&mut self, name: &str) -> RadixTrieResult<RemoveOutcome> {
        let key = G::split_key(name, &self.config)?;
        let result = self.remove_key(&key);
        self.escalate(result, "remove")
    }

    fn remove_key(&mut self, key: &G::Label) -> RadixTrieResult<RemoveOutcome> {
        let mut path = TriePath::new();
        let Some(target) = self.walk(key, LookupMode::Exact, Some(&mut path))? else {
            return Ok(RemoveOutcome::NotFound);
        };

        let step = path
            .last()
            .cloned()
            .ok_or_else(|| RadixTrieError::corrupted("exact match crossed no boundary"))?;
        if step.node != target {
            return Err(RadixTrieError::corrupted(format!(
                "lookup returned {target} but the path ends at {}",
                step.node
            )));
        }

        let node = self.entry(target)?;
        if !node.terminal {
            return Err(RadixTrieError::corrupted(format!(
                "removal target {target} is not terminal"
            )));
        }

        // `len` follows the unlink itself, not the compression after it.
        match node.children.len() {
            0 => {
                self.detach_leaf(step.parent, &step.unit, target)?;
                self.record_removal();
                self.compress_after_detach(step.parent)?;
            }
            1 => {
                self.entry_mut(target)?.terminal = false;
                self.record_removal();
                self.merge_with_only_child(target)?;
                let parent = self.entry(target)?.parent;
                self.merge_ancestors(parent)?;
            }
            _ => {
                self.entry_mut(target)?.terminal = false;
                self.record_removal();
            }
        }

        Ok(RemoveOutcome::Removed)
    }

    fn record_removal(&mut self) {
        self.len -= 1;
        self.counters.removals += 1;
    }

    /// Unlinks `leaf` from `parent` and frees it.
    fn detach_leaf(&mut self, parent: NodeId, unit: &G::Unit, leaf: NodeId) -> RadixTrieResult<()> {
        let parent_node = self.entry_mut(parent)?;
        match parent_node.children.remove(unit) {
            Some(id) if id == leaf => {}
            Some(other) => {
                parent_node.children.insert(unit.clone(), other)?;
                return Err(RadixTrieError::corrupted(format!(
                    "parent {parent} indexes {other} where the path recorded {leaf}"
                )));
            }
            None => {
                return Err(RadixTrieError::corrupted(format!(
                    "parent {parent} has no index entry for {leaf}"
                )));
            }
        }
        self.nodes.remove(leaf);
        trace!(granularity = G::NAME, %parent, %leaf, "Detached leaf");
        Ok(())
    }

    /// Restores compression at `parent` after one of its leaves was dropped.
    fn compress_after_detach(&mut self, parent: NodeId) -> RadixTrieResult<()> {
        if parent == self.root {
            return Ok(());
        }
        let node = self.entry(parent)?;
        if node.terminal || node.children.len() >= 2 {
            return Ok(());
        }
        if node.children.is_empty() {
            return Err(RadixTrieError::corrupted(format!(
                "node {parent} is left without name or children"
            )));
        }
        let grandparent = node.parent;
        self.merge_with_only_child(parent)?;
        self.merge_ancestors(grandparent)
    }

    /// Re-checks compression on every ancestor from `start` up to the root.
    ///
    /// A single removal should never leave an ancestor uncompressed. Any
    /// merge performed here is counted in `cascaded_merges`.
    fn merge_ancestors(&mut self, start: Option<NodeId>) -> RadixTrieResult<()> {
        let mut current = start;
        while let Some(id) = current {
            if id == self.root {
                break;
            }
            let node = self.entry(id)?;
            let parent = node.parent;
            if !node.is_compressed() {
                if node.is_leaf() {
                    return Err(RadixTrieError::corrupted(format!(
                        "node {id} is a leaf without a name"
                    )));
                }
                warn!(granularity = G::NAME, node = %id, "Cascading merge above a removal");
                self.counters.cascaded_merges += 1;
                self.merge_with_only_child(id)?;
            }
            current = parent;
        }
        Ok(())
    }

    /// Absorbs the only child of `id` into it.
    ///
    /// `id` takes the concatenated label, the child's terminal flag and the
    /// child's index; the grandchildren are re-parented to `id`.
    fn merge_with_only_child(&mut self, id: NodeId) -> RadixTrieResult<()> {
        let node = self.entry(id)?;
        if node.children.len() != 1 {
            return Err(RadixTrieError::corrupted(format!(
                "merge of {id} expects one child, found {}",
                node.children.len()
            )));
        }
        let (unit, child) = node
            .children
            .entries()
            .next()
            .map(|(unit, child)| (unit.clone(), child))
            .ok_or_else(|| RadixTrieError::corrupted(format!("node {id} lost its only child")))?;

        let child_node = self.entry(child)?;
        if child_node.parent != Some(id) {
            return Err(RadixTrieError::corrupted(format!(
                "child {child} of {id} points back to {:?}",
                child_node.parent
            )));
        }

        let absorbed = self
            .nodes
            .remove(child)
            .ok_or_else(|| RadixTrieError::corrupted(format!("child {child} vanished")))?;
        let grandchildren: Vec<NodeId> = absorbed.children.entries().map(|(_, g)| g).collect();

        let node = self.entry_mut(id)?;
        node.label.append(&absorbed.label);
        node.terminal = absorbed.terminal;
        node.children = absorbed.children;

        for grandchild in grandchildren {
            self.entry_mut(grandchild)?.parent = Some(id);
        }

        self.counters.merges += 1;
        trace!(granularity = G::NAME, node = %id, %child, ?unit, "Merged node with its only child");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{BitTrie, ByteTrie, ComponentTrie};
    use super::*;

    #[test]
    fn test_remove_missing_name() {
        let mut trie = ComponentTrie::new();
        trie.insert("/ndn/uofa/cs").unwrap();

        assert_eq!(trie.remove("/ndn/uofa").unwrap(), RemoveOutcome::NotFound);
        assert_eq!(trie.remove("/ccn").unwrap(), RemoveOutcome::NotFound);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_remove_branching_node_clears_terminal() {
        let mut trie = ComponentTrie::new();
        let ab = trie.insert("/a/b").unwrap().node();
        trie.insert("/a/b/c").unwrap();
        trie.insert("/a/b/d").unwrap();

        assert_eq!(trie.remove("/a/b").unwrap(), RemoveOutcome::Removed);
        let node = trie.node(ab).unwrap();
        assert!(!node.is_terminal());
        assert_eq!(node.child_count(), 2);
        assert_eq!(trie.counters().merges, 0);
        trie.validate().unwrap();
    }

    #[test]
    fn test_remove_leaf_merges_parent() {
        let mut trie = ComponentTrie::new();
        let cs = trie.insert("/ndn/uofa/cs").unwrap().node();
        trie.insert("/ndn/uofa/ece").unwrap();
        let internal = trie.node(cs).unwrap().parent().unwrap();

        assert_eq!(trie.remove("/ndn/uofa/cs").unwrap(), RemoveOutcome::Removed);
        assert!(trie.node(cs).is_none());

        let merged = trie.node(internal).unwrap();
        assert!(merged.is_terminal());
        assert_eq!(merged.child_count(), 0);
        assert_eq!(trie.name_of(internal).unwrap(), "/ndn/uofa/ece");
        assert_eq!(trie.node_count(), 2);
        assert_eq!(trie.counters().merges, 1);
        trie.validate().unwrap();
    }

    #[test]
    fn test_remove_leaf_keeps_terminal_parent() {
        let mut trie = ByteTrie::new();
        let ab = trie.insert("/ab").unwrap().node();
        trie.insert("/abc").unwrap();

        assert_eq!(trie.remove("/abc").unwrap(), RemoveOutcome::Removed);
        let node = trie.node(ab).unwrap();
        assert!(node.is_terminal());
        assert_eq!(node.child_count(), 0);
        assert_eq!(trie.counters().merges, 0);
    }

    #[test]
    fn test_remove_single_child_node_merges_down() {
        let mut trie = ComponentTrie::new();
        let ab = trie.insert("/a/b").unwrap().node();
        let abc = trie.insert("/a/b/c").unwrap().node();

        assert_eq!(trie.remove("/a/b").unwrap(), RemoveOutcome::Removed);
        assert!(trie.node(abc).is_none());
        let merged = trie.node(ab).unwrap();
        assert!(merged.is_terminal());
        assert_eq!(merged.label_len(), 3);
        assert!(trie.contains("/a/b/c").unwrap());
        trie.validate().unwrap();
    }

    #[test]
    fn test_merge_reparents_grandchildren() {
        let mut trie = ComponentTrie::new();
        trie.insert("/a/b").unwrap();
        trie.insert("/a/b/c/x").unwrap();
        trie.insert("/a/b/c/y").unwrap();

        trie.remove("/a/b").unwrap();
        let x = trie.lookup("/a/b/c/x", LookupMode::Exact).unwrap().unwrap();
        let merged = trie.node(x).unwrap().parent().unwrap();
        assert_eq!(trie.name_of(merged).unwrap(), "/a/b/c");
        assert_eq!(trie.node(merged).unwrap().child_count(), 2);
        trie.validate().unwrap();
    }

    #[test]
    fn test_remove_everything_returns_to_root() {
        let mut trie = BitTrie::new();
        let names = ["/ndn/uofa", "/ndn/ucla", "/ndn", "/ccn/x"];
        for name in names {
            trie.insert(name).unwrap();
        }
        for name in names {
            assert_eq!(trie.remove(name).unwrap(), RemoveOutcome::Removed);
            trie.validate().unwrap();
        }

        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.counters().cascaded_merges, 0);
    }

    #[test]
    fn test_failed_compression_still_counts_removal() {
        let mut trie = ComponentTrie::new();
        trie.insert("/a/b").unwrap();
        trie.insert("/a/c").unwrap();

        // Drop `/a/b` behind the trie's back, leaving `[a]` with one child and no name.
        let b = trie.lookup("/a/b", LookupMode::Exact).unwrap().unwrap();
        let a = trie.node(b).unwrap().parent().unwrap();
        let unit = trie.node(b).unwrap().label().unit(0);
        trie.nodes.get_mut(a).unwrap().children.remove(&unit);
        trie.nodes.remove(b);
        trie.len -= 1;

        let err = trie.remove("/a/c").unwrap_err();
        assert!(matches!(err, RadixTrieError::Corrupted(_)));
        assert!(trie.is_empty());
        assert_eq!(trie.counters().removals, 1);
        assert!(trie.names().is_empty());
    }

    #[test]
    fn test_remove_twice() {
        let mut trie = ByteTrie::new();
        trie.insert("/ndn").unwrap();
        assert_eq!(trie.remove("/ndn").unwrap(), RemoveOutcome::Removed);
        assert_eq!(trie.remove("/ndn").unwrap(), RemoveOutcome::NotFound);
    }
}
