// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hash keys for the hashed children index.
//!
//! Units are hashed with FNV-1a keyed by a per-trie seed. The index is generic
//! over any `BuildHasher`, so tests can swap in a degenerate hasher to force
//! collisions.

use std::hash::{BuildHasher, Hash, Hasher};

use fnv::FnvHasher;

/// `BuildHasher` producing FNV-1a hashers keyed by a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededFnvBuilder {
    seed: u64,
}

impl SeededFnvBuilder {
    /// Creates a builder for the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// The seed mixed into every hash.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BuildHasher for SeededFnvBuilder {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::with_key(self.seed)
    }
}

/// Computes the 64-bit hash key of a unit.
pub fn unit_hash<U, S>(builder: &S, unit: &U) -> u64
where
    U: Hash + ?Sized,
    S: BuildHasher,
{
    let mut hasher = builder.build_hasher();
    unit.hash(&mut hasher);
    hasher.finish()
}
