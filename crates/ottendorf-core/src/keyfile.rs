//! Key material: immutable key files and their SHA-256 fingerprints
//!
//! Key files are the shared secret. They are ingested once, never mutated,
//! and never transmitted; only their fingerprints travel on the wire so that
//! sender and receiver can verify they hold identical copies.

use crate::error::{CipherError, Result};
use sha2::{Digest, Sha256};
use std::fmt;

/// Size of a SHA-256 digest in bytes
pub const FINGERPRINT_BYTE_SIZE: usize = 32;

/// Minimum number of key files in the modern scheme
pub const MIN_KEY_FILES: usize = 2;

/// Maximum number of key files in the modern scheme
pub const MAX_KEY_FILES: usize = 5;

/// A SHA-256 content fingerprint, rendered as lowercase hex on the wire
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_BYTE_SIZE]);

impl Fingerprint {
    /// Compute the fingerprint of a byte buffer
    pub fn compute(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; FINGERPRINT_BYTE_SIZE];
        out.copy_from_slice(&digest);
        Self(out)
    }

    /// Parse a fingerprint from a hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != FINGERPRINT_BYTE_SIZE {
            return Err(CipherError::InvalidFingerprint(format!(
                "expected {} bytes, got {}",
                FINGERPRINT_BYTE_SIZE,
                bytes.len()
            )));
        }
        let mut out = [0u8; FINGERPRINT_BYTE_SIZE];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Get the fingerprint as raw bytes
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_BYTE_SIZE] {
        &self.0
    }

    /// Convert to a lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// One key file: id, display name, raw bytes, and content fingerprint
///
/// Immutable after construction. The fingerprint is computed once from the
/// ingested bytes.
#[derive(Clone, Debug)]
pub struct KeyFile {
    id: u32,
    name: String,
    bytes: Vec<u8>,
    fingerprint: Fingerprint,
}

impl KeyFile {
    /// Create a key file from ingested bytes; `id` must be positive
    pub fn new(id: u32, name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        if id == 0 {
            return Err(CipherError::InvalidFileId(id));
        }
        let fingerprint = Fingerprint::compute(&bytes);
        Ok(Self {
            id,
            name: name.into(),
            bytes,
            fingerprint,
        })
    }

    /// The file's id (positive, unique within a key set)
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The file's display name (carried as `Path` on the wire)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw key bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The SHA-256 fingerprint of the raw bytes
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Length of the file's bitstream
    pub fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }
}

/// An ordered set of 2 to 5 key files with unique ids
#[derive(Clone, Debug)]
pub struct KeySet {
    files: Vec<KeyFile>,
}

impl KeySet {
    /// Validate and wrap a list of key files
    pub fn new(files: Vec<KeyFile>) -> Result<Self> {
        if files.len() < MIN_KEY_FILES || files.len() > MAX_KEY_FILES {
            return Err(CipherError::KeyFileCount(files.len()));
        }
        for (i, file) in files.iter().enumerate() {
            if files[..i].iter().any(|other| other.id == file.id) {
                return Err(CipherError::DuplicateFileId(file.id));
            }
        }
        Ok(Self { files })
    }

    /// Build a key set from inline text blocks, assigning ids in order
    pub fn from_texts(texts: &[&str]) -> Result<Self> {
        let files = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                KeyFile::new(
                    i as u32 + 1,
                    format!("text-{}.txt", i + 1),
                    text.as_bytes().to_vec(),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(files)
    }

    /// The key files, in ingestion order
    pub fn files(&self) -> &[KeyFile] {
        &self.files
    }

    /// Look up a key file by id
    pub fn get(&self, id: u32) -> Option<&KeyFile> {
        self.files.iter().find(|file| file.id == id)
    }
}
