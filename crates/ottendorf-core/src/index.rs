//! Block index: reverse mapping from bit-pattern to key material locations
//!
//! Built fresh per encryption from the loaded key set and the chosen block
//! width, and discarded when the operation completes. Patterns are exact
//! `u32` keys (width <= 32), so lookups never suffer hash-collision
//! ambiguity.

use crate::bits;
use crate::error::Result;
use crate::keyfile::KeySet;
use crate::wire::Address;
use std::collections::HashMap;

/// Reverse index from block pattern to every occurrence in the key material
///
/// Entries are append-only during construction: within a bucket, addresses
/// appear in file order, then block order. A pattern that occurs nowhere has
/// no entry.
#[derive(Debug)]
pub struct BlockIndex {
    width: u8,
    buckets: HashMap<u32, Vec<Address>>,
    blocks_per_file: Vec<(u32, u64)>,
}

impl BlockIndex {
    /// Scan the key set at `width` bits per block and build the index
    pub fn build(keys: &KeySet, width: u8) -> Result<Self> {
        bits::validate_width(width)?;
        let mut buckets: HashMap<u32, Vec<Address>> = HashMap::new();
        let mut blocks_per_file = Vec::with_capacity(keys.files().len());

        for file in keys.files() {
            let stream = bits::bytes_to_bits(file.bytes());
            let blocks = bits::split_into_blocks(&stream, width)?;
            for (i, &pattern) in blocks.iter().enumerate() {
                buckets
                    .entry(pattern)
                    .or_default()
                    .push(Address::new(file.id(), i as u64 + 1));
            }
            blocks_per_file.push((file.id(), blocks.len() as u64));
        }

        tracing::debug!(
            width,
            files = keys.files().len(),
            patterns = buckets.len(),
            "block index built"
        );

        Ok(Self {
            width,
            buckets,
            blocks_per_file,
        })
    }

    /// All occurrences of a pattern, or `None` if it appears nowhere
    pub fn lookup(&self, pattern: u32) -> Option<&[Address]> {
        self.buckets.get(&pattern).map(Vec::as_slice)
    }

    /// The block width this index was built at
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Per-file block counts, in key set order
    pub fn blocks_per_file(&self) -> &[(u32, u64)] {
        &self.blocks_per_file
    }

    /// Number of distinct patterns present in the key material
    pub fn pattern_count(&self) -> usize {
        self.buckets.len()
    }
}
