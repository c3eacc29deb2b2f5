// Copyright (c) 2025 Trie Granularity Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node labels: ordered runs of comparison units.
//!
//! A label is what a node stores and what a decomposed key is. The engine
//! only ever needs to read one unit, measure a common prefix against a key
//! at some offset, cut a label in two and glue two labels together.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Ordered sequence of comparison units.
pub trait Label: Clone + Debug + Default + PartialEq {
    /// The atomic comparison unit.
    type Unit: Clone + Eq + Hash + Debug;

    /// Number of units in the label.
    fn len(&self) -> usize;

    /// Returns true if the label holds no unit.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    fn unit(&self, index: usize) -> Self::Unit;

    /// Number of leading units of `self` equal to the units of `key` starting at `offset`.
    fn common_prefix_len(&self, key: &Self, offset: usize) -> usize;

    /// Copy of the units from `start` to the end.
    fn suffix(&self, start: usize) -> Self;

    /// Keeps the units before `at` and returns the rest.
    fn split_off(&mut self, at: usize) -> Self;

    /// Appends the units of `other`.
    fn append(&mut self, other: &Self);
}

/// A run of bits read most significant bit first.
///
/// Bits past `bits` in the last byte are always zero, so two labels with the
/// same bits compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitLabel {
    bytes: Vec<u8>,
    bits: usize,
}

impl BitLabel {
    /// Creates a label holding every bit of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            bits: bytes.len() * 8,
        }
    }

    /// Backing bytes, zero padded to a whole byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Eight bits starting at bit `start`, zero padded past the end.
    fn window(&self, start: usize) -> u8 {
        let byte = start / 8;
        let shift = start % 8;
        let hi = self.bytes.get(byte).copied().unwrap_or(0) << shift;
        let lo = if shift > 0 {
            self.bytes.get(byte + 1).copied().unwrap_or(0) >> (8 - shift)
        } else {
            0
        };
        hi | lo
    }

    /// Appends the top `count` bits of `byte`; the remaining bits must be zero.
    fn push_bits(&mut self, byte: u8, count: usize) {
        let shift = self.bits % 8;
        if shift == 0 {
            self.bytes.push(byte);
        } else {
            if let Some(last) = self.bytes.last_mut() {
                *last |= byte >> shift;
            }
            if count > 8 - shift {
                self.bytes.push(byte << (8 - shift));
            }
        }
        self.bits += count;
    }

    fn truncate(&mut self, at: usize) {
        self.bytes.truncate((at + 7) / 8);
        let rem = at % 8;
        if rem != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFF << (8 - rem);
            }
        }
        self.bits = at;
    }
}

impl Label for BitLabel {
    type Unit = bool;

    fn len(&self) -> usize {
        self.bits
    }

    fn unit(&self, index: usize) -> bool {
        assert!(index < self.bits, "bit {index} out of range {}", self.bits);
        (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    fn common_prefix_len(&self, key: &Self, offset: usize) -> usize {
        let max = self.bits.min(key.bits.saturating_sub(offset));
        let mut matched = 0;
        while matched < max {
            let diff = (self.window(matched) ^ key.window(offset + matched)).leading_zeros() as usize;
            let step = (max - matched).min(8);
            if diff < step {
                return matched + diff;
            }
            matched += step;
        }
        matched
    }

    fn suffix(&self, start: usize) -> Self {
        let mut out = Self::default();
        let mut pos = start;
        while pos < self.bits {
            let count = (self.bits - pos).min(8);
            out.push_bits(self.window(pos), count);
            pos += count;
        }
        out
    }

    fn split_off(&mut self, at: usize) -> Self {
        let tail = self.suffix(at);
        self.truncate(at);
        tail
    }

    fn append(&mut self, other: &Self) {
        if self.bits % 8 == 0 {
            self.bytes.extend_from_slice(&other.bytes);
            self.bits += other.bits;
            return;
        }
        let mut pos = 0;
        while pos < other.bits {
            let count = (other.bits - pos).min(8);
            self.push_bits(other.window(pos), count);
            pos += count;
        }
    }
}

/// A run of raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteLabel(Vec<u8>);

impl ByteLabel {
    /// Creates a label from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// The label bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Label for ByteLabel {
    type Unit = u8;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn unit(&self, index: usize) -> u8 {
        self.0[index]
    }

    fn common_prefix_len(&self, key: &Self, offset: usize) -> usize {
        let rest = key.0.get(offset..).unwrap_or_default();
        self.0
            .iter()
            .zip(rest)
            .take_while(|(a, b)| a == b)
            .count()
    }

    fn suffix(&self, start: usize) -> Self {
        Self(self.0[start..].to_vec())
    }

    fn split_off(&mut self, at: usize) -> Self {
        Self(self.0.split_off(at))
    }

    fn append(&mut self, other: &Self) {
        self.0.extend_from_slice(&other.0);
    }
}

/// A run of `/`-delimited name components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ComponentLabel(Vec<Arc<str>>);

impl ComponentLabel {
    /// Creates a label from components.
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self(components.into_iter().map(Into::into).collect())
    }

    /// The label components.
    pub fn components(&self) -> &[Arc<str>] {
        &self.0
    }
}

impl Label for ComponentLabel {
    type Unit = Arc<str>;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn unit(&self, index: usize) -> Arc<str> {
        Arc::clone(&self.0[index])
    }

    fn common_prefix_len(&self, key: &Self, offset: usize) -> usize {
        let rest = key.0.get(offset..).unwrap_or_default();
        self.0
            .iter()
            .zip(rest)
            .take_while(|(a, b)| a == b)
            .count()
    }

    fn suffix(&self, start: usize) -> Self {
        Self(self.0[start..].to_vec())
    }

    fn split_off(&mut self, at: usize) -> Self {
        Self(self.0.split_off(at))
    }

    fn append(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }
}
