//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use crate::config::{
    get_global_config, init_global_config, ConfigLoader, IndexConfig, LogConfig,
    TrieGranularityConfig, TrieLimits, Validate,
};
use crate::data_structures::radix_trie::RadixTrieConfig;
use crate::error::config::ConfigError;
use crate::tests::TestFixture;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = TrieGranularityConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.trie.limits.max_name_len, 4096);
    assert_eq!(config.trie.limits.max_components, 100);
    assert_eq!(config.trie.index.initial_size, 1);
    assert_eq!(config.trie.index.hash_seed, 1234);
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = TrieGranularityConfig::default();

    config.trie.limits.max_components = 0;
    assert!(config.validate().is_err());

    config.trie.limits.max_components = 10;
    config.trie.index.max_load_factor = 1.5;
    assert!(config.validate().is_err());

    config.trie.index.max_load_factor = 0.5;
    config.log.level = "verbose".to_string();
    assert!(config.validate().is_err());

    config.log.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

/// Test the individual validation rules.
#[test]
fn test_specific_validation_rules() {
    let limits = TrieLimits {
        max_name_len: 1,
        ..TrieLimits::default()
    };
    assert!(matches!(
        limits.validate(),
        Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "trie.limits.max_name_len"
    ));

    let limits = TrieLimits {
        max_height: Some(0),
        ..TrieLimits::default()
    };
    assert!(limits.validate().is_err());

    let index = IndexConfig {
        initial_size: 0,
        ..IndexConfig::default()
    };
    assert!(index.validate().is_err());

    let log = LogConfig {
        level: "warn".to_string(),
        ..LogConfig::default()
    };
    assert!(log.validate().is_ok());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "config_file_test.toml",
            r#"
            [trie.limits]
            max_name_len = 512
            max_components = 20

            [trie.index]
            initial_size = 4
            max_load_factor = 0.75
            hash_seed = 99

            [log]
            level = "debug"
            json = true
            source_location = false
            "#,
        )
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_TRIE_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.trie.limits.max_name_len, 512);
    assert_eq!(config.trie.limits.max_components, 20);
    assert_eq!(config.trie.limits.max_height, None);
    assert_eq!(config.trie.index.initial_size, 4);
    assert_eq!(config.trie.index.hash_seed, 99);
    assert_eq!(config.log.level, "debug");
    assert!(config.log.json);
}

/// Test loading a JSON configuration that only sets some values.
#[test]
fn test_load_partial_json_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("partial.json", r#"{ "trie": { "limits": { "max_height": 64 } } }"#)
        .unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_TRIE_JSON")
        .load()
        .unwrap();

    assert_eq!(config.trie.limits.max_height, Some(64));
    assert_eq!(config.trie.limits.max_components, 100);
    assert_eq!(config.log, LogConfig::default());
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "config_env_test.toml",
            r#"
            [trie.limits]
            max_components = 20
            "#,
        )
        .unwrap();
    fixture.set_env("TEST_TRIE_ENV__TRIE__LIMITS__MAX_COMPONENTS", "12");
    fixture.set_env("TEST_TRIE_ENV__LOG__LEVEL", "trace");

    let config = ConfigLoader::new(Some(&config_path), "TEST_TRIE_ENV")
        .load()
        .unwrap();

    assert_eq!(config.trie.limits.max_components, 12);
    assert_eq!(config.log.level, "trace");
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("invalid.toml", "[trie.limits\nmax_name_len = ")
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_TRIE_INVALID");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that a file which parses but breaks a rule is rejected.
#[test]
fn test_load_config_failing_validation() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("zero.toml", "[trie.index]\ninitial_size = 0\n")
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_TRIE_ZERO");
    assert!(matches!(loader.load(), Err(ConfigError::ValueOutOfRange { .. })));
}

/// Test missing files and unsupported extensions.
#[test]
fn test_load_missing_and_unsupported() {
    let fixture = TestFixture::new().unwrap();

    let missing = fixture.temp_dir.path().join("missing.toml");
    assert!(matches!(
        ConfigLoader::new(Some(&missing), "TEST_TRIE_MISSING").load(),
        Err(ConfigError::FileNotFound(_))
    ));

    let ini = fixture.create_file("config.ini", "x = 1").unwrap();
    assert!(matches!(
        ConfigLoader::new(Some(&ini), "TEST_TRIE_INI").load(),
        Err(ConfigError::ParseError(_))
    ));
}

/// Test that a generated configuration file loads back unchanged.
#[test]
fn test_generated_config_loads_back() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.temp_dir.path().join("generated.toml");

    let mut config = TrieGranularityConfig::default();
    config.trie.limits.max_height = Some(32);
    config.write_toml(&path).unwrap();

    let loaded = ConfigLoader::new(Some(&path), "TEST_TRIE_GENERATED")
        .load()
        .unwrap();
    assert_eq!(loaded, config);
}

/// Test the conversion into the data structure configuration.
#[test]
fn test_radix_trie_config_conversion() {
    let mut config = TrieGranularityConfig::default();
    config.trie.limits.max_components = 7;
    config.trie.limits.max_height = Some(50);
    config.trie.index.hash_seed = 5;

    let trie_config = RadixTrieConfig::from(&config);
    assert_eq!(trie_config.max_components, 7);
    assert_eq!(trie_config.max_height, Some(50));
    assert_eq!(trie_config.hash_seed, 5);
    assert!(trie_config.validate().is_ok());
}

/// Test the global configuration accessors.
#[test]
fn test_global_config() {
    init_global_config(TrieGranularityConfig::default());
    let global = get_global_config().unwrap();
    assert!(global.get().validate().is_ok());
}
