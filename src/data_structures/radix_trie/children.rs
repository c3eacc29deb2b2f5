// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Children indexes.
//!
//! A children index maps the first unit of each child's label to the child.
//! Bit tries use [`BinaryIndex`], a pair of direct slots. Byte and component
//! tries use the chained [`HashedIndex`](super::hashed::HashedIndex).

use std::fmt::Debug;

use super::arena::NodeId;
use super::config::IndexSettings;
use super::error::{RadixTrieError, RadixTrieResult};

/// Result of inserting into a children index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The unit was free and now maps to the new child.
    Inserted,
    /// The unit already maps to the contained child; nothing changed.
    AlreadyPresent(NodeId),
}

/// Map from a unit to the child whose label starts with it.
pub trait ChildrenIndex<U>: Debug {
    /// Creates an empty index.
    fn with_settings(settings: &IndexSettings) -> Self;

    /// Finds the child keyed by `unit`.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the index is found inconsistent.
    fn get(&self, unit: &U) -> RadixTrieResult<Option<NodeId>>;

    /// Adds `unit -> child`; a unit already present is left untouched.
    fn insert(&mut self, unit: U, child: NodeId) -> RadixTrieResult<SlotOutcome>;

    /// Points an existing unit at a new child and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns `RadixTrieError::Corrupted` if the unit has no slot.
    fn replace(&mut self, unit: &U, child: NodeId) -> RadixTrieResult<NodeId>;

    /// Unlinks `unit` and returns the child it pointed at.
    fn remove(&mut self, unit: &U) -> Option<NodeId>;

    /// Number of children.
    fn len(&self) -> usize;

    /// Returns true if there is no child.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots currently allocated.
    fn capacity(&self) -> usize;

    /// Every `(unit, child)` pair, in no particular order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&U, NodeId)> + '_>;
}

/// Two slots keyed by a single bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryIndex {
    slots: [Option<NodeId>; 2],
}

impl BinaryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(bit: bool) -> usize {
        usize::from(bit)
    }
}

impl ChildrenIndex<bool> for BinaryIndex {
    fn with_settings(_settings: &IndexSettings) -> Self {
        Self::new()
    }

    fn get(&self, unit: &bool) -> RadixTrieResult<Option<NodeId>> {
        Ok(self.slots[Self::slot(*unit)])
    }

    fn insert(&mut self, unit: bool, child: NodeId) -> RadixTrieResult<SlotOutcome> {
        let slot = &mut self.slots[Self::slot(unit)];
        match slot {
            Some(existing) => Ok(SlotOutcome::AlreadyPresent(*existing)),
            None => {
                *slot = Some(child);
                Ok(SlotOutcome::Inserted)
            }
        }
    }

    fn replace(&mut self, unit: &bool, child: NodeId) -> RadixTrieResult<NodeId> {
        self.slots[Self::slot(*unit)]
            .replace(child)
            .ok_or_else(|| RadixTrieError::corrupted(format!("no child for bit {}", u8::from(*unit))))
    }

    fn remove(&mut self, unit: &bool) -> Option<NodeId> {
        self.slots[Self::slot(*unit)].take()
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&bool, NodeId)> + '_> {
        Box::new(
            [&false, &true]
                .into_iter()
                .zip(self.slots.iter())
                .filter_map(|(bit, slot)| slot.map(|child| (bit, child))),
        )
    }
}
