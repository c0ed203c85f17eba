//! Wire entities for the JSON cipher format
//!
//! Field names and shapes match the external format exactly: payloads carry
//! `KBits`, `BitLength`, `Files` and `Addresses`, with each address encoded
//! as a `[fileId, blockId]` pair.

use crate::bits::{self, MAX_BLOCK_BITS};
use crate::error::{CipherError, Result};
use serde::{Deserialize, Serialize};

/// A block address: (key file id, 1-based block id)
///
/// Serializes as a two-element JSON array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub u32, pub u64);

impl Address {
    /// Create an address
    pub fn new(file_id: u32, block_id: u64) -> Self {
        Self(file_id, block_id)
    }

    /// The referenced key file id
    pub fn file_id(&self) -> u32 {
        self.0
    }

    /// The 1-based block position within that file's bitstream
    pub fn block_id(&self) -> u64 {
        self.1
    }
}

/// Description of one key file as recorded in a payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Key file id
    #[serde(rename = "Id")]
    pub id: u32,
    /// Display name of the file
    #[serde(rename = "Path")]
    pub path: String,
    /// SHA-256 fingerprint of the file's bytes, lowercase hex
    #[serde(rename = "Sha256")]
    pub sha256: String,
    /// Number of blocks the file splits into at the payload's block width
    #[serde(rename = "BlocksCount")]
    pub blocks_count: u64,
}

/// The modern-scheme cipher payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherPayload {
    /// Block width in bits
    #[serde(rename = "KBits")]
    pub k_bits: u8,
    /// True plaintext bit count before padding
    #[serde(rename = "BitLength")]
    pub bit_length: u64,
    /// Key files the addresses refer into
    #[serde(rename = "Files")]
    pub files: Vec<FileEntry>,
    /// One address per plaintext block, in plaintext order
    #[serde(rename = "Addresses")]
    pub addresses: Vec<Address>,
}

impl CipherPayload {
    /// Structural validation, applied before any key material is touched
    ///
    /// Checks the block width range, byte alignment of the bit length, file
    /// id uniqueness, the address-count invariant
    /// (`Addresses.len == ceil(BitLength / KBits)`), and that every address
    /// references a recorded file.
    pub fn validate(&self) -> Result<()> {
        if self.k_bits == 0 || self.k_bits > MAX_BLOCK_BITS {
            return Err(CipherError::InvalidBlockWidth(self.k_bits));
        }
        if self.bit_length % 8 != 0 {
            return Err(CipherError::UnalignedBitLength(self.bit_length));
        }
        for (i, entry) in self.files.iter().enumerate() {
            if entry.id == 0 {
                return Err(CipherError::InvalidFileId(entry.id));
            }
            if self.files[..i].iter().any(|other| other.id == entry.id) {
                return Err(CipherError::DuplicateFileId(entry.id));
            }
        }
        let expected = bits::block_count(self.bit_length, self.k_bits);
        if self.addresses.len() as u64 != expected {
            return Err(CipherError::AddressCountMismatch {
                expected,
                actual: self.addresses.len() as u64,
            });
        }
        for address in &self.addresses {
            if !self.files.iter().any(|entry| entry.id == address.file_id()) {
                return Err(CipherError::UnknownFileId(address.file_id()));
            }
        }
        Ok(())
    }
}

/// A plaintext message envelope: encrypt input and decrypt output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// The plaintext message
    pub message: String,
}

/// The legacy-scheme payload: one 16-bit binary address string per character
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPayload {
    /// Addresses in message order
    pub cipher: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> CipherPayload {
        CipherPayload {
            k_bits: 8,
            bit_length: 16,
            files: vec![FileEntry {
                id: 1,
                path: "alpha.txt".to_string(),
                sha256: "aa".repeat(32),
                blocks_count: 4,
            }],
            addresses: vec![Address::new(1, 3), Address::new(1, 1)],
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let value = serde_json::to_value(sample_payload()).unwrap();
        assert_eq!(
            value,
            json!({
                "KBits": 8,
                "BitLength": 16,
                "Files": [{
                    "Id": 1,
                    "Path": "alpha.txt",
                    "Sha256": "aa".repeat(32),
                    "BlocksCount": 4,
                }],
                "Addresses": [[1, 3], [1, 1]],
            })
        );
    }

    #[test]
    fn test_payload_json_roundtrip() {
        let payload = sample_payload();
        let text = serde_json::to_string_pretty(&payload).unwrap();
        let parsed: CipherPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_payload().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_width() {
        let mut payload = sample_payload();
        payload.k_bits = 0;
        assert!(matches!(
            payload.validate(),
            Err(CipherError::InvalidBlockWidth(0))
        ));
        payload.k_bits = 33;
        assert!(matches!(
            payload.validate(),
            Err(CipherError::InvalidBlockWidth(33))
        ));
    }

    #[test]
    fn test_validate_rejects_unaligned_bit_length() {
        let mut payload = sample_payload();
        payload.bit_length = 17;
        // 17 bits at width 8 would need 3 addresses; keep the count invariant
        // satisfied so the alignment check is what fires.
        payload.addresses.push(Address::new(1, 2));
        assert!(matches!(
            payload.validate(),
            Err(CipherError::UnalignedBitLength(17))
        ));
    }

    #[test]
    fn test_validate_rejects_address_count_mismatch() {
        let mut payload = sample_payload();
        payload.addresses.pop();
        assert!(matches!(
            payload.validate(),
            Err(CipherError::AddressCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_validate_rejects_unrecorded_file_reference() {
        let mut payload = sample_payload();
        payload.addresses[1] = Address::new(9, 1);
        assert!(matches!(
            payload.validate(),
            Err(CipherError::UnknownFileId(9))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_file_entries() {
        let mut payload = sample_payload();
        payload.files.push(payload.files[0].clone());
        assert!(matches!(
            payload.validate(),
            Err(CipherError::DuplicateFileId(1))
        ));
    }

    #[test]
    fn test_message_envelope_shape() {
        let envelope: MessageEnvelope = serde_json::from_str(r#"{"message": "Hi"}"#).unwrap();
        assert_eq!(envelope.message, "Hi");
    }

    #[test]
    fn test_legacy_payload_shape() {
        let payload: LegacyPayload =
            serde_json::from_str(r#"{"cipher": ["0000000100000001"]}"#).unwrap();
        assert_eq!(payload.cipher, vec!["0000000100000001"]);
    }
}
