//! Block Reconstructor: the decrypt path
//!
//! Order of operations is load-bearing: the payload is structurally
//! validated first, then every referenced key file passes the fingerprint
//! integrity gate, and only then are addresses resolved. A corrupted or
//! substituted key file must fail loudly before it can produce garbage
//! plaintext.

use crate::bits::{self, BitBuf};
use crate::error::{CipherError, Result};
use crate::keyfile::{Fingerprint, KeyFile, KeySet};
use crate::wire::CipherPayload;
use std::collections::HashMap;

/// Decrypt a payload against locally held key material
pub fn decrypt(payload: &CipherPayload, keys: &KeySet) -> Result<String> {
    payload.validate()?;
    verify_integrity(payload, keys)?;

    let width = payload.k_bits;
    let mut tables: HashMap<u32, Vec<u32>> = HashMap::new();
    for entry in &payload.files {
        let file = local_file(keys, entry.id)?;
        let stream = bits::bytes_to_bits(file.bytes());
        tables.insert(entry.id, bits::split_into_blocks(&stream, width)?);
    }

    let mut accumulator = BitBuf::with_capacity(payload.addresses.len() * width as usize);
    for address in &payload.addresses {
        let table = tables
            .get(&address.file_id())
            .ok_or(CipherError::UnknownFileId(address.file_id()))?;
        let block_id = address.block_id();
        if block_id == 0 || block_id > table.len() as u64 {
            return Err(CipherError::AddressOutOfRange {
                file_id: address.file_id(),
                block_id,
                blocks_count: table.len() as u64,
            });
        }
        bits::push_block(&mut accumulator, table[(block_id - 1) as usize], width);
    }

    if (accumulator.len() as u64) < payload.bit_length {
        return Err(CipherError::TruncatedPayload {
            expected: payload.bit_length,
            actual: accumulator.len() as u64,
        });
    }
    // Everything past BitLength is the synthetic zero-padding the encoder
    // added to its final block.
    accumulator.truncate(payload.bit_length as usize);

    let bytes = bits::bits_to_bytes(&accumulator)?;
    tracing::debug!(
        bytes = bytes.len(),
        addresses = payload.addresses.len(),
        "payload reconstructed"
    );
    Ok(String::from_utf8(bytes)?)
}

/// Fail unless every payload file entry matches a local key file by id and
/// fingerprint. Runs to completion before any block is looked up.
fn verify_integrity(payload: &CipherPayload, keys: &KeySet) -> Result<()> {
    for entry in &payload.files {
        let file = local_file(keys, entry.id)?;
        let expected = Fingerprint::from_hex(&entry.sha256)?;
        if file.fingerprint() != expected {
            return Err(CipherError::IntegrityMismatch {
                file_id: entry.id,
                path: entry.path.clone(),
                expected: entry.sha256.clone(),
                actual: file.fingerprint().to_hex(),
            });
        }
    }
    tracing::debug!(files = payload.files.len(), "key material integrity verified");
    Ok(())
}

fn local_file(keys: &KeySet, id: u32) -> Result<&KeyFile> {
    keys.get(id).ok_or(CipherError::UnknownFileId(id))
}
