// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Lookup engine.

use super::arena::NodeId;
use super::children::ChildrenIndex;
use super::error::{RadixTrieError, RadixTrieResult};
use super::granularity::Granularity;
use super::label::Label;
use super::RadixTrie;

/// How a lookup treats a key that is not stored exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Found only if the whole key ends at a terminal node.
    #[default]
    Exact,
    /// The deepest terminal node whose name is a prefix of the key.
    LongestPrefix,
}

/// One crossed node boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep<U> {
    /// Node the walk came from.
    pub parent: NodeId,
    /// Unit the child is indexed by in `parent`.
    pub unit: U,
    /// Node the walk entered.
    pub node: NodeId,
}

/// Boundaries crossed by an exact lookup, root first.
///
/// After a miss the path holds the boundaries crossed before the walk failed.
#[derive(Debug, Clone, PartialEq)]
pub struct TriePath<U> {
    steps: Vec<PathStep<U>>,
}

impl<U> Default for TriePath<U> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<U> TriePath<U> {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The recorded steps, root first.
    pub fn steps(&self) -> &[PathStep<U>] {
        &self.steps
    }

    /// The deepest recorded step.
    pub fn last(&self) -> Option<&PathStep<U>> {
        self.steps.last()
    }

    fn push(&mut self, step: PathStep<U>) {
        self.steps.push(step);
    }
}

impl<G: Granularity> RadixTrie<G> {
    /// Looks up a name.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(id))` - The node that matched under `mode`.
    /// * `Ok(None)` - Nothing matched.
    /// * `Err(RadixTrieError)` - The name is malformed, or the trie is corrupted.
    pub fn lookup(&self, name: &str, mode: LookupMode) -> RadixTrieResult<Option<NodeId>> {
        let key = G::split_key(name, &self.config)?;
        let result = self.walk(&key, mode, None);
        self.escalate(result, "lookup")
    }

    /// Exact lookup that records every crossed boundary into `path`.
    ///
    /// `path` is cleared first.
    pub fn lookup_path(
        &self,
        name: &str,
        path: &mut TriePath<G::Unit>,
    ) -> RadixTrieResult<Option<NodeId>> {
        let key = G::split_key(name, &self.config)?;
        let result = self.walk(&key, LookupMode::Exact, Some(path));
        self.escalate(result, "lookup")
    }

    /// Returns true if `name` is stored.
    pub fn contains(&self, name: &str) -> RadixTrieResult<bool> {
        Ok(self.lookup(name, LookupMode::Exact)?.is_some())
    }

    pub(super) fn walk(
        &self,
        key: &G::Label,
        mode: LookupMode,
        mut path: Option<&mut TriePath<G::Unit>>,
    ) -> RadixTrieResult<Option<NodeId>> {
        if let Some(path) = path.as_deref_mut() {
            path.clear();
        }
        let miss = |best: Option<NodeId>| match mode {
            LookupMode::Exact => None,
            LookupMode::LongestPrefix => best,
        };

        let mut parent = self.root;
        let mut offset = 0;
        let mut depth = 0;
        let mut best = None;

        loop {
            let unit = key.unit(offset);
            let Some(child) = self.entry(parent)?.children.get(&unit)? else {
                return Ok(miss(best));
            };

            depth += 1;
            self.check_height(depth)?;

            let node = self.entry(child)?;
            self.check_first_unit(child, node, &unit)?;
            if node.parent != Some(parent) {
                return Err(RadixTrieError::corrupted(format!(
                    "node {child} is indexed under {parent} but points back to {:?}",
                    node.parent
                )));
            }

            let matched = node.label.common_prefix_len(key, offset);
            if matched < node.label.len() {
                return Ok(miss(best));
            }
            offset += matched;

            if let Some(path) = path.as_deref_mut() {
                path.push(PathStep {
                    parent,
                    unit,
                    node: child,
                });
            }
            if node.terminal {
                best = Some(child);
            }

            if offset == key.len() {
                return Ok(if node.terminal { Some(child) } else { miss(best) });
            }
            parent = child;
        }
    }
}
