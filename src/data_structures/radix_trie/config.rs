// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the radix trie.

use super::error::{RadixTrieError, RadixTrieResult};

/// Default maximum name length in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 4096;

/// Default maximum number of components in a name.
pub const DEFAULT_MAX_COMPONENTS: usize = 100;

/// Default number of buckets allocated by a hashed children index.
pub const DEFAULT_INDEX_INITIAL_SIZE: usize = 1;

/// Default load factor above which a hashed children index doubles.
pub const DEFAULT_INDEX_MAX_LOAD_FACTOR: f64 = 0.5;

/// Default seed of the children index hasher.
pub const DEFAULT_HASH_SEED: u64 = 1234;

/// Configuration for a radix trie.
#[derive(Debug, Clone, PartialEq)]
pub struct RadixTrieConfig {
    /// Maximum accepted name length in bytes.
    pub max_name_len: usize,

    /// Maximum number of `/`-separated components in a name.
    pub max_components: usize,

    /// Maximum number of nodes on any root-to-leaf walk.
    ///
    /// `None` derives the bound from the longest admissible key, which a
    /// well-formed trie can never exceed.
    pub max_height: Option<usize>,

    /// Number of buckets a hashed children index allocates on first insert.
    pub index_initial_size: usize,

    /// Load factor above which a hashed children index doubles its buckets.
    pub index_max_load_factor: f64,

    /// Seed mixed into every children index hash.
    pub hash_seed: u64,
}

impl RadixTrieConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum accepted name length in bytes.
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }

    /// Sets the maximum number of components in a name.
    pub fn with_max_components(mut self, max_components: usize) -> Self {
        self.max_components = max_components;
        self
    }

    /// Sets an explicit maximum trie height.
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// Sets the initial bucket count of hashed children indexes.
    pub fn with_index_initial_size(mut self, initial_size: usize) -> Self {
        self.index_initial_size = initial_size;
        self
    }

    /// Sets the load factor that triggers a rehash.
    pub fn with_index_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.index_max_load_factor = max_load_factor;
        self
    }

    /// Sets the hash seed.
    pub fn with_hash_seed(mut self, seed: u64) -> Self {
        self.hash_seed = seed;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `RadixTrieError::InvalidConfiguration` naming the first invalid field.
    pub fn validate(&self) -> RadixTrieResult<()> {
        if self.max_name_len < 2 {
            return Err(RadixTrieError::InvalidConfiguration(
                "max_name_len must be at least 2".to_string(),
            ));
        }

        if self.max_components == 0 {
            return Err(RadixTrieError::InvalidConfiguration(
                "max_components must be greater than 0".to_string(),
            ));
        }

        if self.max_height == Some(0) {
            return Err(RadixTrieError::InvalidConfiguration(
                "max_height must be greater than 0".to_string(),
            ));
        }

        if self.index_initial_size == 0 {
            return Err(RadixTrieError::InvalidConfiguration(
                "index_initial_size must be greater than 0".to_string(),
            ));
        }

        if !(self.index_max_load_factor > 0.0 && self.index_max_load_factor <= 1.0) {
            return Err(RadixTrieError::InvalidConfiguration(format!(
                "index_max_load_factor must be in (0, 1], got {}",
                self.index_max_load_factor
            )));
        }

        Ok(())
    }

    /// Settings shared by every children index of the trie.
    pub fn index_settings(&self) -> IndexSettings {
        IndexSettings {
            initial_size: self.index_initial_size,
            max_load_factor: self.index_max_load_factor,
            seed: self.hash_seed,
        }
    }
}

impl Default for RadixTrieConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_components: DEFAULT_MAX_COMPONENTS,
            max_height: None,
            index_initial_size: DEFAULT_INDEX_INITIAL_SIZE,
            index_max_load_factor: DEFAULT_INDEX_MAX_LOAD_FACTOR,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

/// Sizing and hashing parameters handed to each children index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexSettings {
    /// Buckets allocated on first insert.
    pub initial_size: usize,
    /// Load factor above which the index doubles.
    pub max_load_factor: f64,
    /// Hasher seed.
    pub seed: u64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        RadixTrieConfig::default().index_settings()
    }
}
