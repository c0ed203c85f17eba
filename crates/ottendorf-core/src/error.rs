//! Error types for the ottendorf-core crate

use thiserror::Error;

/// Result type alias using `CipherError`
pub type Result<T> = std::result::Result<T, CipherError>;

/// Errors that can occur during cipher operations
#[derive(Error, Debug)]
pub enum CipherError {
    /// Block width outside the supported range
    #[error("block width must be between 1 and 32 bits, got {0}")]
    InvalidBlockWidth(u8),

    /// Wrong number of key files
    #[error("expected between 2 and 5 key files, got {0}")]
    KeyFileCount(usize),

    /// Key file id must be a positive integer
    #[error("key file id must be positive, got {0}")]
    InvalidFileId(u32),

    /// Two key files carry the same id
    #[error("duplicate key file id: {0}")]
    DuplicateFileId(u32),

    /// Fingerprint is not a valid SHA-256 hex digest
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Plaintext block absent from the key material
    #[error("block {block} ({pattern}) not found in key material")]
    PatternNotFound { block: usize, pattern: String },

    /// Key file content differs from the fingerprint recorded in the payload
    #[error(
        "key material integrity check failed for file {file_id} ({path}): \
         expected {expected}, got {actual}"
    )]
    IntegrityMismatch {
        file_id: u32,
        path: String,
        expected: String,
        actual: String,
    },

    /// Referenced key file id does not exist
    #[error("unknown key file id: {0}")]
    UnknownFileId(u32),

    /// Block id outside the referenced file's block range
    #[error("address out of range: block {block_id} in file {file_id} (file has {blocks_count} blocks)")]
    AddressOutOfRange {
        file_id: u32,
        block_id: u64,
        blocks_count: u64,
    },

    /// Reconstructed fewer bits than the payload declares
    #[error("insufficient bits reconstructed: expected {expected}, got {actual}")]
    TruncatedPayload { expected: u64, actual: u64 },

    /// Bit length is not a whole number of bytes
    #[error("bit length {0} is not a whole number of bytes")]
    UnalignedBitLength(u64),

    /// Address count does not match the declared bit length
    #[error("expected {expected} addresses for the declared bit length, got {actual}")]
    AddressCountMismatch { expected: u64, actual: u64 },

    /// Legacy key text is empty or whitespace-only
    #[error("key text must not be empty")]
    EmptyKeyText,

    /// Character absent from the legacy key text
    #[error("character {0:?} not found in key text")]
    CharacterNotFound(char),

    /// First occurrence of a character lies beyond the 8-bit coordinate range
    #[error("character {character:?} first occurs at ({row}, {col}), which does not fit an 8-bit coordinate")]
    CoordinateOverflow {
        character: char,
        row: usize,
        col: usize,
    },

    /// Legacy address fails a format check
    #[error("malformed address {address:?}: {reason}")]
    MalformedAddress {
        address: String,
        reason: &'static str,
    },

    /// Legacy row coordinate outside the key text
    #[error("row {row} out of range: key text has {rows} lines")]
    RowOutOfRange { row: usize, rows: usize },

    /// Legacy column coordinate outside its line
    #[error("column {col} out of range: line {row} has {len} characters")]
    ColumnOutOfRange { row: usize, col: usize, len: usize },

    /// Reconstructed bytes are not valid UTF-8
    #[error("reconstructed bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Hex decode error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
