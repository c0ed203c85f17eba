//! Legacy Coordinate Cipher: character-granularity book cipher
//!
//! The older sibling of the block scheme: one multi-line key text, one
//! lookup per character. Each character encodes as the 1-based (row, column)
//! of its *first* occurrence, each coordinate an 8-bit big-endian binary
//! string, concatenated into a 16-character address. No randomization in
//! this variant.

use crate::error::{CipherError, Result};
use crate::wire::LegacyPayload;

const ADDRESS_BITS: usize = 16;
const COORDINATE_MAX: usize = u8::MAX as usize;

/// Encrypt a message against a multi-line key text
pub fn encrypt(key_text: &str, message: &str) -> Result<LegacyPayload> {
    let lines = key_lines(key_text)?;
    let mut cipher = Vec::with_capacity(message.chars().count());
    for character in message.chars() {
        let (row, col) = locate(&lines, character)?;
        cipher.push(format!("{row:08b}{col:08b}"));
    }
    tracing::debug!(characters = cipher.len(), "legacy message encoded");
    Ok(LegacyPayload { cipher })
}

/// Decrypt a list of 16-bit addresses against the same key text
pub fn decrypt(key_text: &str, payload: &LegacyPayload) -> Result<String> {
    let lines = key_lines(key_text)?;
    let mut message = String::with_capacity(payload.cipher.len());
    for address in &payload.cipher {
        message.push(resolve(&lines, address)?);
    }
    Ok(message)
}

/// Split the key text into addressable rows, rejecting an empty key
fn key_lines(key_text: &str) -> Result<Vec<&str>> {
    if key_text.trim().is_empty() {
        return Err(CipherError::EmptyKeyText);
    }
    Ok(key_text.split('\n').collect())
}

/// First occurrence of `character`, as 1-based (row, column)
fn locate(lines: &[&str], character: char) -> Result<(usize, usize)> {
    for (row, line) in lines.iter().enumerate() {
        if let Some(col) = line.chars().position(|c| c == character) {
            let (row, col) = (row + 1, col + 1);
            if row > COORDINATE_MAX || col > COORDINATE_MAX {
                return Err(CipherError::CoordinateOverflow {
                    character,
                    row,
                    col,
                });
            }
            return Ok((row, col));
        }
    }
    Err(CipherError::CharacterNotFound(character))
}

/// Validate one 16-bit address and fetch the character it points at
fn resolve(lines: &[&str], address: &str) -> Result<char> {
    if address.len() != ADDRESS_BITS {
        return Err(CipherError::MalformedAddress {
            address: address.to_string(),
            reason: "expected exactly 16 bits",
        });
    }
    if !address.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(CipherError::MalformedAddress {
            address: address.to_string(),
            reason: "contains characters other than 0 and 1",
        });
    }
    let malformed = |_| CipherError::MalformedAddress {
        address: address.to_string(),
        reason: "coordinate does not parse",
    };
    let row = usize::from_str_radix(&address[..8], 2).map_err(malformed)?;
    let col = usize::from_str_radix(&address[8..], 2).map_err(malformed)?;

    if row < 1 || row > lines.len() {
        return Err(CipherError::RowOutOfRange {
            row,
            rows: lines.len(),
        });
    }
    let line = lines[row - 1];
    let len = line.chars().count();
    if col < 1 || col > len {
        return Err(CipherError::ColumnOutOfRange { row, col, len });
    }
    line.chars()
        .nth(col - 1)
        .ok_or(CipherError::ColumnOutOfRange { row, col, len })
}
