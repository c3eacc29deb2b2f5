//! Test modules for trie granularity.
//!
//! This module contains the crate-level testing infrastructure:
//! - Configuration loading and validation tests
//! - Error type and reporting tests
//! - Property-based tests of the trie invariants using proptest
//! - Shared strategies and fixtures

pub mod config_tests;

pub use test_utils::{
    component_strategy, name_set_strategy, name_strategy, operation_strategy, Operation,
    TestFixture,
};
