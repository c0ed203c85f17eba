//! Address Resolver: the encrypt path
//!
//! Each plaintext block is replaced by the address of one of its occurrences
//! in the key material. When a pattern occurs more than once, the occurrence
//! is chosen uniformly at random, so repeated plaintext blocks map to
//! different addresses across runs. The random source is injectable; it does
//! not need to be cryptographically secure, only unbiased over candidates.

use crate::bits;
use crate::error::{CipherError, Result};
use crate::index::BlockIndex;
use crate::keyfile::KeySet;
use crate::wire::{CipherPayload, FileEntry};
use rand::Rng;

/// Encrypt a message against a key set at `width` bits per block
///
/// Convenience wrapper over [`encrypt_with_rng`] using the thread-local
/// random source.
pub fn encrypt(message: &str, keys: &KeySet, width: u8) -> Result<CipherPayload> {
    encrypt_with_rng(message, keys, width, &mut rand::thread_rng())
}

/// Encrypt a message, choosing among duplicate occurrences with `rng`
pub fn encrypt_with_rng<R: Rng + ?Sized>(
    message: &str,
    keys: &KeySet,
    width: u8,
    rng: &mut R,
) -> Result<CipherPayload> {
    let index = BlockIndex::build(keys, width)?;

    let stream = bits::bytes_to_bits(message.as_bytes());
    let bit_length = stream.len() as u64;
    let blocks = bits::split_into_blocks(&stream, width)?;

    let mut addresses = Vec::with_capacity(blocks.len());
    for (i, &pattern) in blocks.iter().enumerate() {
        let candidates = index.lookup(pattern).ok_or_else(|| CipherError::PatternNotFound {
            block: i + 1,
            pattern: bits::pattern_string(pattern, width),
        })?;
        // Buckets are never empty: entries only exist for observed patterns.
        let pick = rng.gen_range(0..candidates.len());
        addresses.push(candidates[pick]);
    }

    let files = keys
        .files()
        .iter()
        .zip(index.blocks_per_file())
        .map(|(file, &(_, blocks_count))| FileEntry {
            id: file.id(),
            path: file.name().to_string(),
            sha256: file.fingerprint().to_hex(),
            blocks_count,
        })
        .collect();

    tracing::debug!(
        bit_length,
        blocks = addresses.len(),
        width,
        "message resolved to addresses"
    );

    Ok(CipherPayload {
        k_bits: width,
        bit_length,
        files,
        addresses,
    })
}
