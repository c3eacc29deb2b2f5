// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Read-only walks: visitors, statistics, invariant checks and enumeration.

use serde::Serialize;

use super::arena::NodeId;
use super::children::ChildrenIndex;
use super::error::{RadixTrieError, RadixTrieResult};
use super::granularity::Granularity;
use super::label::Label;
use super::node::NodeView;
use super::RadixTrie;

/// Callback invoked for every node of a walk.
pub trait TrieVisitor<G: Granularity> {
    /// Visits `node`, reached from `parent` at `depth` (the root is at depth 0).
    fn visit(&mut self, node: NodeView<'_, G>, parent: Option<NodeView<'_, G>>, depth: usize);
}

/// Shape statistics of a trie.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrieStats {
    /// Nodes, root included.
    pub nodes: usize,
    /// Nodes where a stored name ends.
    pub terminals: usize,
    /// Nodes without children.
    pub leaves: usize,
    /// Depth of the deepest node.
    pub max_depth: usize,
    /// Sum of leaf depths.
    pub depth_sum: usize,
    /// Number of nodes at each depth.
    pub level_widths: Vec<usize>,
    /// Total label units stored.
    pub label_units: usize,
    /// Children index slots allocated across all nodes.
    pub index_capacity: usize,
    /// Children index entries across all nodes.
    pub index_entries: usize,
}

impl TrieStats {
    /// Mean depth of a leaf.
    pub fn average_leaf_depth(&self) -> f64 {
        if self.leaves == 0 {
            0.0
        } else {
            self.depth_sum as f64 / self.leaves as f64
        }
    }

    /// Fraction of allocated children slots that are used.
    pub fn index_occupancy(&self) -> f64 {
        if self.index_capacity == 0 {
            0.0
        } else {
            self.index_entries as f64 / self.index_capacity as f64
        }
    }
}

impl<G: Granularity> TrieVisitor<G> for TrieStats {
    fn visit(&mut self, node: NodeView<'_, G>, _parent: Option<NodeView<'_, G>>, depth: usize) {
        self.nodes += 1;
        self.label_units += node.label_len();
        self.index_capacity += node.index_capacity();
        self.index_entries += node.child_count();
        if node.is_terminal() {
            self.terminals += 1;
        }
        if node.child_count() == 0 {
            self.leaves += 1;
            self.depth_sum += depth;
        }
        self.max_depth = self.max_depth.max(depth);
        if self.level_widths.len() <= depth {
            self.level_widths.resize(depth + 1, 0);
        }
        self.level_widths[depth] += 1;
    }
}

impl<G: Granularity> RadixTrie<G> {
    /// Walks every node depth first, parents before children.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(NodeView<'_, G>, Option<NodeView<'_, G>>, usize),
    {
        let mut stack: Vec<(NodeId, Option<NodeId>, usize)> = vec![(self.root, None, 0)];
        while let Some((id, parent, depth)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let parent_view = parent.and_then(|p| self.node(p));
            visit(node, parent_view, depth);
            stack.extend(node.children().map(|child| (child, Some(id), depth + 1)));
        }
    }

    /// Runs `visitor` over every node.
    pub fn accept<V: TrieVisitor<G>>(&self, visitor: &mut V) {
        self.for_each(|node, parent, depth| visitor.visit(node, parent, depth));
    }

    /// Collects shape statistics.
    pub fn stats(&self) -> TrieStats {
        let mut stats = TrieStats::default();
        self.accept(&mut stats);
        stats
    }

    /// Every stored name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.len);
        let mut stack = vec![(self.root, G::Label::default())];
        while let Some((id, mut prefix)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            prefix.append(&node.label);
            if node.terminal {
                names.push(G::render(&prefix));
            }
            for (_, child) in node.children.entries() {
                stack.push((child, prefix.clone()));
            }
        }
        names.sort();
        names
    }

    /// Checks every structural invariant.
    ///
    /// * Every non-root node ends a name or has at least two children.
    /// * Each child's label starts with the unit it is indexed by.
    /// * Each child points back to the node indexing it.
    /// * The number of terminal nodes equals `len()`.
    ///
    /// # Errors
    ///
    /// Returns `RadixTrieError::Corrupted` describing the first violation.
    pub fn validate(&self) -> RadixTrieResult<()> {
        let root = self.entry(self.root)?;
        if root.parent.is_some() {
            return Err(RadixTrieError::corrupted("root has a parent"));
        }

        let mut terminals = 0;
        let mut reachable = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            self.check_height(depth)?;
            let node = self.entry(id)?;
            reachable += 1;
            if node.terminal {
                terminals += 1;
            }
            if id != self.root {
                if node.label.is_empty() {
                    return Err(RadixTrieError::corrupted(format!("node {id} has an empty label")));
                }
                if !node.is_compressed() {
                    return Err(RadixTrieError::corrupted(format!(
                        "node {id} has {} children and no name",
                        node.children.len()
                    )));
                }
            }

            for (unit, child) in node.children.entries() {
                let child_node = self.entry(child)?;
                self.check_first_unit(child, child_node, unit)?;
                if child_node.parent != Some(id) {
                    return Err(RadixTrieError::corrupted(format!(
                        "child {child} of {id} points back to {:?}",
                        child_node.parent
                    )));
                }
                stack.push((child, depth + 1));
            }
        }

        if terminals != self.len {
            return Err(RadixTrieError::corrupted(format!(
                "{terminals} terminal nodes for {} stored names",
                self.len
            )));
        }
        if reachable != self.nodes.len() {
            return Err(RadixTrieError::corrupted(format!(
                "{reachable} reachable nodes but {} allocated",
                self.nodes.len()
            )));
        }
        Ok(())
    }
}
