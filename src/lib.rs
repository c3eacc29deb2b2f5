//! Trie Granularity Library
//!
//! Compressed (radix) tries over hierarchical, slash-delimited names, at
//! three comparison granularities: bit, byte and name component. The library
//! is used by the `trie-granularity` binary, but can also be used as a
//! dependency by other projects.
//!
//! # Architecture
//!
//! - `data_structures::radix_trie` holds the single generic trie engine and
//!   the unit models plugged into it
//! - `config` loads and validates settings from files and the environment
//! - `error` defines the crate-wide error type and the reporting hook
//! - `driver` runs name workloads for the binary

pub mod config;
pub mod data_structures;
pub mod driver;
pub mod error;

#[cfg(test)]
pub(crate) mod tests;

#[cfg(feature = "benchmarking")]
pub mod bench;

use std::path::Path;
use std::sync::Arc;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Installs the tracing error reporter, loads the configuration from
/// `config_path` (defaults and environment when `None`) and makes it the
/// global configuration.
pub fn init(config_path: Option<&Path>) -> error::TrieGranularityResult<config::TrieGranularityConfig> {
    error::set_error_reporter(Arc::new(error::TracingErrorReporter));

    let loader = config::ConfigLoader::new(config_path, config::ENV_PREFIX);
    let loaded = loader.load()?;
    config::init_global_config(loaded.clone());

    Ok(loaded)
}
