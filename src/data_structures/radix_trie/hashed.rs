// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Chained hash table used as the children index of byte and component tries.
//!
//! Entries are `(hash, unit, child)` triples kept in per-bucket chains. The
//! bucket vector is allocated on the first insert and doubles whenever the
//! next insert would push the load factor above the configured maximum.
//! Removal never shrinks the table.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use tracing::debug;

use super::arena::NodeId;
use super::children::{ChildrenIndex, SlotOutcome};
use super::config::IndexSettings;
use super::error::{RadixTrieError, RadixTrieResult};
use super::hash::{unit_hash, SeededFnvBuilder};

#[derive(Debug, Clone)]
struct Entry<U> {
    hash: u64,
    unit: U,
    child: NodeId,
}

/// Hashed children index with separate chaining and doubling rehash.
#[derive(Clone)]
pub struct HashedIndex<U, S = SeededFnvBuilder> {
    buckets: Vec<Vec<Entry<U>>>,
    used: usize,
    initial_size: usize,
    max_load_factor: f64,
    rehashes: usize,
    hasher: S,
}

impl<U, S> HashedIndex<U, S>
where
    U: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty index hashing with `hasher`.
    pub fn with_hasher(settings: &IndexSettings, hasher: S) -> Self {
        Self {
            buckets: Vec::new(),
            used: 0,
            initial_size: settings.initial_size.max(1),
            max_load_factor: settings.max_load_factor,
            rehashes: 0,
            hasher,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.used
    }

    /// Returns true if the index holds no entry.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Number of buckets; zero until the first insert.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket.
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.used as f64 / self.buckets.len() as f64
        }
    }

    /// Number of times the bucket vector doubled.
    pub fn rehash_count(&self) -> usize {
        self.rehashes
    }

    /// Length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Finds the child keyed by `unit`.
    ///
    /// # Errors
    ///
    /// Returns `RadixTrieError::HashCollision` if an entry with the same hash
    /// key holds a different unit.
    pub fn get(&self, unit: &U) -> RadixTrieResult<Option<NodeId>> {
        if self.buckets.is_empty() {
            return Ok(None);
        }
        let hash = unit_hash(&self.hasher, unit);
        for entry in &self.buckets[self.bucket_of(hash)] {
            if entry.hash == hash {
                if entry.unit == *unit {
                    return Ok(Some(entry.child));
                }
                return Err(RadixTrieError::HashCollision { hash });
            }
        }
        Ok(None)
    }

    /// Adds `unit -> child` unless the unit is already present.
    ///
    /// The duplicate check runs before any rehash, so a no-op insert never
    /// grows the table.
    pub fn insert(&mut self, unit: U, child: NodeId) -> RadixTrieResult<SlotOutcome> {
        if let Some(existing) = self.get(&unit)? {
            return Ok(SlotOutcome::AlreadyPresent(existing));
        }

        if self.buckets.is_empty() {
            self.buckets = (0..self.initial_size).map(|_| Vec::new()).collect();
        }
        while (self.used + 1) as f64 / self.buckets.len() as f64 > self.max_load_factor {
            self.rehash();
        }

        let hash = unit_hash(&self.hasher, &unit);
        let bucket = self.bucket_of(hash);
        self.buckets[bucket].push(Entry { hash, unit, child });
        self.used += 1;
        Ok(SlotOutcome::Inserted)
    }

    /// Points `unit` at `child` and returns the previous child.
    pub fn replace(&mut self, unit: &U, child: NodeId) -> RadixTrieResult<NodeId> {
        if self.buckets.is_empty() {
            return Err(RadixTrieError::corrupted("replace on an empty children index"));
        }
        let hash = unit_hash(&self.hasher, unit);
        let bucket = self.bucket_of(hash);
        let entry = self.buckets[bucket]
            .iter_mut()
            .find(|entry| entry.hash == hash && entry.unit == *unit)
            .ok_or_else(|| RadixTrieError::corrupted(format!("no children slot for key {hash:#018x}")))?;
        Ok(std::mem::replace(&mut entry.child, child))
    }

    /// Unlinks `unit` from its chain.
    pub fn remove(&mut self, unit: &U) -> Option<NodeId> {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = unit_hash(&self.hasher, unit);
        let bucket = self.bucket_of(hash);
        let chain = &mut self.buckets[bucket];
        let position = chain
            .iter()
            .position(|entry| entry.hash == hash && entry.unit == *unit)?;
        let entry = chain.swap_remove(position);
        self.used -= 1;
        Some(entry.child)
    }

    /// Every `(unit, child)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&U, NodeId)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .map(|entry| (&entry.unit, entry.child))
    }

    /// Stores an entry under an arbitrary hash key, bypassing every check.
    #[cfg(test)]
    pub(crate) fn insert_with_hash(&mut self, hash: u64, unit: U, child: NodeId) {
        if self.buckets.is_empty() {
            self.buckets = (0..self.initial_size).map(|_| Vec::new()).collect();
        }
        let bucket = self.bucket_of(hash);
        self.buckets[bucket].push(Entry { hash, unit, child });
        self.used += 1;
    }

    fn rehash(&mut self) {
        let new_size = self.buckets.len() * 2;
        let old = std::mem::replace(
            &mut self.buckets,
            (0..new_size).map(|_| Vec::new()).collect(),
        );
        for entry in old.into_iter().flatten() {
            let bucket = self.bucket_of(entry.hash);
            self.buckets[bucket].push(entry);
        }
        self.rehashes += 1;
        debug!(
            buckets = new_size,
            entries = self.used,
            "Rehashed children index"
        );
    }
}

impl<U: fmt::Debug, S> fmt::Debug for HashedIndex<U, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedIndex")
            .field("entries", &self.used)
            .field("buckets", &self.buckets.len())
            .field("rehashes", &self.rehashes)
            .finish()
    }
}

impl<U> ChildrenIndex<U> for HashedIndex<U, SeededFnvBuilder>
where
    U: Eq + Hash + fmt::Debug,
{
    fn with_settings(settings: &IndexSettings) -> Self {
        Self::with_hasher(settings, SeededFnvBuilder::new(settings.seed))
    }

    fn get(&self, unit: &U) -> RadixTrieResult<Option<NodeId>> {
        HashedIndex::get(self, unit)
    }

    fn insert(&mut self, unit: U, child: NodeId) -> RadixTrieResult<SlotOutcome> {
        HashedIndex::insert(self, unit, child)
    }

    fn replace(&mut self, unit: &U, child: NodeId) -> RadixTrieResult<NodeId> {
        HashedIndex::replace(self, unit, child)
    }

    fn remove(&mut self, unit: &U) -> Option<NodeId> {
        HashedIndex::remove(self, unit)
    }

    fn len(&self) -> usize {
        self.used
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&U, NodeId)> + '_> {
        Box::new(self.iter())
    }
}
