// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node storage.
//!
//! Every node of a trie lives in one slot map owned by the trie. Nodes refer
//! to each other through [`NodeId`] keys; a freed slot is versioned so a
//! stale key resolves to nothing instead of to the slot's next tenant.

use std::fmt;

use slotmap::{Key, SlotMap};

use super::error::{RadixTrieError, RadixTrieResult};

slotmap::new_key_type! {
    /// Handle to a node stored in a trie.
    pub struct NodeId;
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.data())
    }
}

/// Upper bound on live slots; slot indices are 32 bits wide.
const MAX_SLOTS: usize = (u32::MAX - 1) as usize;

/// Slot map of values addressed by versioned [`NodeId`] keys.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    slots: SlotMap<NodeId, T>,
}

impl<T> NodeArena<T> {
    /// Creates an arena holding a single value and returns its key.
    pub fn with_first(value: T) -> (Self, NodeId) {
        let mut slots = SlotMap::with_key();
        let first = slots.insert(value);
        (Self { slots }, first)
    }

    /// Stores a value and returns its key.
    pub fn alloc(&mut self, value: T) -> RadixTrieResult<NodeId> {
        if self.slots.len() >= MAX_SLOTS {
            return Err(RadixTrieError::ArenaExhausted(self.slots.len()));
        }
        Ok(self.slots.insert(value))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id)
    }

    /// Frees a slot and returns its value. Stale keys return `None`.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.slots.remove(id)
    }

    /// Drops every value except the one behind `keep`.
    pub fn retain_only(&mut self, keep: NodeId) {
        self.slots.retain(|id, _| id == keep);
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
