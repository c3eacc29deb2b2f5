//! Data structures for trie granularity.
//!
//! This module contains the compressed name trie and the pieces it is built
//! from. The implementation keeps to the project rules:
//! - No unsafe code
//! - Explicit error propagation, no panics on malformed input
//! - Structural invariants checked during every mutation

pub mod radix_trie;

pub use radix_trie::{
    BitTrie, ByteTrie, ComponentTrie, Granularity, InsertOutcome, LookupMode, RadixTrie,
    RadixTrieConfig, RadixTrieError, RadixTrieResult, RemoveOutcome,
};
