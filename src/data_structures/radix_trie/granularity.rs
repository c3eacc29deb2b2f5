// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Unit models.
//!
//! A [`Granularity`] decides what the atomic comparison unit is, how a raw
//! name is decomposed into a key, which label the root carries and which
//! children index the nodes use. The end of a name is never a unit of its own;
//! it is the `terminal` flag of the node where the key runs out.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use super::children::{BinaryIndex, ChildrenIndex};
use super::config::RadixTrieConfig;
use super::error::{RadixTrieError, RadixTrieResult};
use super::hashed::HashedIndex;
use super::label::{BitLabel, ByteLabel, ComponentLabel, Label};

/// Name delimiter.
pub const DELIMITER: u8 = b'/';

/// Atomic comparison unit of a trie and everything derived from it.
pub trait Granularity: Debug + 'static {
    /// The comparison unit.
    type Unit: Clone + Eq + Hash + Debug;

    /// Ordered run of units stored in a node.
    type Label: Label<Unit = Self::Unit>;

    /// Children index keyed by a unit.
    type Children: ChildrenIndex<Self::Unit>;

    /// Short name used in logs and statistics.
    const NAME: &'static str;

    /// Label of the root node.
    fn root_label() -> Self::Label;

    /// Validates `name` and returns the units that follow the root label.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if the name is rejected.
    fn split_key(name: &str, config: &RadixTrieConfig) -> RadixTrieResult<Self::Label>;

    /// Longest admissible key, in units.
    fn max_key_units(config: &RadixTrieConfig) -> usize;

    /// Renders a full name label (root label included) as text.
    fn render(label: &Self::Label) -> String;

    /// Renders a single node label for debugging output.
    fn describe_label(label: &Self::Label) -> String;
}

/// Checks the rules shared by every granularity.
fn check_name(name: &str, config: &RadixTrieConfig) -> RadixTrieResult<()> {
    if name.len() < 2 {
        return Err(RadixTrieError::NameTooShort {
            name: name.to_string(),
        });
    }
    if name.as_bytes()[0] != DELIMITER {
        return Err(RadixTrieError::MissingDelimiter {
            name: name.to_string(),
        });
    }
    if name.len() > config.max_name_len {
        return Err(RadixTrieError::NameTooLong {
            len: name.len(),
            max_len: config.max_name_len,
        });
    }
    Ok(())
}

/// One unit per bit, read most significant bit first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitGranularity;

impl Granularity for BitGranularity {
    type Unit = bool;
    type Label = BitLabel;
    type Children = BinaryIndex;

    const NAME: &'static str = "bit";

    fn root_label() -> BitLabel {
        BitLabel::from_bytes(&[DELIMITER])
    }

    fn split_key(name: &str, config: &RadixTrieConfig) -> RadixTrieResult<BitLabel> {
        check_name(name, config)?;
        Ok(BitLabel::from_bytes(&name.as_bytes()[1..]))
    }

    fn max_key_units(config: &RadixTrieConfig) -> usize {
        config.max_name_len * 8
    }

    fn render(label: &BitLabel) -> String {
        String::from_utf8_lossy(label.as_bytes()).into_owned()
    }

    fn describe_label(label: &BitLabel) -> String {
        (0..label.len())
            .map(|i| if label.unit(i) { '1' } else { '0' })
            .collect()
    }
}

/// One unit per byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteGranularity;

impl Granularity for ByteGranularity {
    type Unit = u8;
    type Label = ByteLabel;
    type Children = HashedIndex<u8>;

    const NAME: &'static str = "byte";

    fn root_label() -> ByteLabel {
        ByteLabel::from_bytes(&[DELIMITER])
    }

    fn split_key(name: &str, config: &RadixTrieConfig) -> RadixTrieResult<ByteLabel> {
        check_name(name, config)?;
        Ok(ByteLabel::from_bytes(&name.as_bytes()[1..]))
    }

    fn max_key_units(config: &RadixTrieConfig) -> usize {
        config.max_name_len
    }

    fn render(label: &ByteLabel) -> String {
        String::from_utf8_lossy(label.as_bytes()).into_owned()
    }

    fn describe_label(label: &ByteLabel) -> String {
        format!("{:?}", String::from_utf8_lossy(label.as_bytes()))
    }
}

/// One unit per non-empty `/`-separated component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentGranularity;

impl Granularity for ComponentGranularity {
    type Unit = Arc<str>;
    type Label = ComponentLabel;
    type Children = HashedIndex<Arc<str>>;

    const NAME: &'static str = "component";

    fn root_label() -> ComponentLabel {
        ComponentLabel::default()
    }

    fn split_key(name: &str, config: &RadixTrieConfig) -> RadixTrieResult<ComponentLabel> {
        check_name(name, config)?;
        let components: Vec<&str> = name.split('/').filter(|part| !part.is_empty()).collect();
        if components.is_empty() {
            return Err(RadixTrieError::NoComponents {
                name: name.to_string(),
            });
        }
        if components.len() > config.max_components {
            return Err(RadixTrieError::TooManyComponents {
                count: components.len(),
                max_components: config.max_components,
            });
        }
        Ok(ComponentLabel::from_components(components))
    }

    fn max_key_units(config: &RadixTrieConfig) -> usize {
        config.max_components
    }

    fn render(label: &ComponentLabel) -> String {
        let mut name = String::new();
        for component in label.components() {
            name.push('/');
            name.push_str(component);
        }
        if name.is_empty() {
            name.push('/');
        }
        name
    }

    fn describe_label(label: &ComponentLabel) -> String {
        let parts: Vec<&str> = label.components().iter().map(|c| &**c).collect();
        format!("[{}]", parts.join(", "))
    }
}
