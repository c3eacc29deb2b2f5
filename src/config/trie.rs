//! Trie configuration module.
//!
//! This module defines the name limits accepted by every trie and the tuning
//! of the hashed children index.

use serde::{Deserialize, Serialize};

use super::{ConfigResult, Validate};
use crate::data_structures::radix_trie::config::{
    DEFAULT_HASH_SEED, DEFAULT_INDEX_INITIAL_SIZE, DEFAULT_INDEX_MAX_LOAD_FACTOR,
    DEFAULT_MAX_COMPONENTS, DEFAULT_MAX_NAME_LEN,
};
use crate::data_structures::radix_trie::RadixTrieConfig;
use crate::error::config::ConfigError;

/// Trie configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TrieConfig {
    /// Name and height limits
    pub limits: TrieLimits,

    /// Hashed children index tuning
    pub index: IndexConfig,
}

impl Validate for TrieConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.limits.validate()?;
        self.index.validate()?;
        Ok(())
    }
}

impl From<&TrieConfig> for RadixTrieConfig {
    fn from(config: &TrieConfig) -> Self {
        let mut trie = RadixTrieConfig::new()
            .with_max_name_len(config.limits.max_name_len)
            .with_max_components(config.limits.max_components)
            .with_index_initial_size(config.index.initial_size)
            .with_index_max_load_factor(config.index.max_load_factor)
            .with_hash_seed(config.index.hash_seed);
        if let Some(max_height) = config.limits.max_height {
            trie = trie.with_max_height(max_height);
        }
        trie
    }
}

/// Limits on accepted names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrieLimits {
    /// Maximum name length in bytes
    pub max_name_len: usize,

    /// Maximum number of components in a name
    pub max_components: usize,

    /// Maximum trie height; derived from the name limits when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<usize>,
}

impl Default for TrieLimits {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_components: DEFAULT_MAX_COMPONENTS,
            max_height: None,
        }
    }
}

impl Validate for TrieLimits {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_name_len < 2 {
            return Err(ConfigError::ValueOutOfRange {
                key: "trie.limits.max_name_len".to_string(),
                message: "must be at least 2".to_string(),
            });
        }

        if self.max_components == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "trie.limits.max_components".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.max_height == Some(0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "trie.limits.max_height".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Hashed children index configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// Buckets allocated on first insert
    pub initial_size: usize,

    /// Load factor above which the index doubles
    pub max_load_factor: f64,

    /// Seed of the FNV hasher
    pub hash_seed: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_INDEX_INITIAL_SIZE,
            max_load_factor: DEFAULT_INDEX_MAX_LOAD_FACTOR,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

impl Validate for IndexConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.initial_size == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "trie.index.initial_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "trie.index.max_load_factor".to_string(),
                message: format!("must be in (0, 1], got {}", self.max_load_factor),
            });
        }

        Ok(())
    }
}
