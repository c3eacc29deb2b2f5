// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the radix trie.
//!
//! Errors fall into two families. Malformed input is rejected before the trie
//! is touched. Structural errors mean an invariant was found broken in the
//! middle of an operation; the operation is aborted and the error is escalated.

use thiserror::Error;

/// Errors that can occur in radix trie operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RadixTrieError {
    /// The name is shorter than two bytes.
    #[error("Name '{name}' is too short, a name needs at least two bytes")]
    NameTooShort {
        /// The rejected name.
        name: String,
    },

    /// The name does not start with the `/` delimiter.
    #[error("Name '{name}' does not start with the '/' delimiter")]
    MissingDelimiter {
        /// The rejected name.
        name: String,
    },

    /// The name has no non-empty component.
    #[error("Name '{name}' has no component")]
    NoComponents {
        /// The rejected name.
        name: String,
    },

    /// The name exceeds the configured maximum length.
    #[error("Name of {len} bytes exceeds the maximum length of {max_len} bytes")]
    NameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
        /// Configured maximum.
        max_len: usize,
    },

    /// The name has more components than allowed.
    #[error("Name has {count} components, more than the maximum of {max_components}")]
    TooManyComponents {
        /// Number of components found.
        count: usize,
        /// Configured maximum.
        max_components: usize,
    },

    /// A walk descended deeper than the configured maximum height.
    #[error("Trie height exceeded the maximum of {max_height}")]
    MaxHeightExceeded {
        /// Configured maximum.
        max_height: usize,
    },

    /// Two different units produced the same hash key inside a children index.
    #[error("Hash collision in children index for key {hash:#018x}")]
    HashCollision {
        /// The colliding hash key.
        hash: u64,
    },

    /// A node, index entry or back-reference contradicts the trie invariants.
    #[error("Structural corruption: {0}")]
    Corrupted(String),

    /// The node arena cannot address another node.
    #[error("Node arena exhausted after {0} slots")]
    ArenaExhausted(usize),

    /// The trie configuration is invalid.
    #[error("Invalid trie configuration: {0}")]
    InvalidConfiguration(String),
}

impl RadixTrieError {
    /// Creates a structural corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Returns true if the error rejects a malformed name.
    ///
    /// The trie is left unchanged by these errors.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::NameTooShort { .. }
                | Self::MissingDelimiter { .. }
                | Self::NoComponents { .. }
                | Self::NameTooLong { .. }
                | Self::TooManyComponents { .. }
        )
    }

    /// Returns true if the error signals a broken trie invariant.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MaxHeightExceeded { .. } | Self::HashCollision { .. } | Self::Corrupted(_)
        )
    }
}

/// Result type for radix trie operations.
pub type RadixTrieResult<T> = Result<T, RadixTrieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RadixTrieError::NameTooShort {
            name: "/".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Name '/' is too short, a name needs at least two bytes"
        );

        let err = RadixTrieError::NameTooLong {
            len: 5000,
            max_len: 4096,
        };
        assert_eq!(
            err.to_string(),
            "Name of 5000 bytes exceeds the maximum length of 4096 bytes"
        );

        let err = RadixTrieError::HashCollision { hash: 0xff };
        assert_eq!(
            err.to_string(),
            "Hash collision in children index for key 0x00000000000000ff"
        );

        let err = RadixTrieError::corrupted("dangling child");
        assert_eq!(err.to_string(), "Structural corruption: dangling child");
    }

    #[test]
    fn test_error_classification() {
        let malformed = RadixTrieError::MissingDelimiter {
            name: "ndn".to_string(),
        };
        assert!(malformed.is_malformed_input());
        assert!(!malformed.is_structural());

        let structural = RadixTrieError::MaxHeightExceeded { max_height: 100 };
        assert!(structural.is_structural());
        assert!(!structural.is_malformed_input());

        let config = RadixTrieError::InvalidConfiguration("zero".to_string());
        assert!(!config.is_structural());
        assert!(!config.is_malformed_input());
    }
}
