//! # Ottendorf Core
//!
//! A book-cipher codec: plaintext is never transmitted, only *addresses*
//! into shared key material.
//!
//! This crate provides:
//! - **Bit-Packer**: canonical MSB-first bitstream conversion and fixed-width
//!   block splitting with zero-padding
//! - **Block Index**: exact reverse index from k-bit pattern to every
//!   (file, block) location in the key material
//! - **Address Resolver**: the encrypt path, with uniform random choice among
//!   duplicate occurrences
//! - **Block Reconstructor**: the decrypt path, gated on SHA-256 integrity
//!   verification of the key material
//! - **Legacy Coordinate Cipher**: the character-granularity sibling scheme
//!   (first occurrence as a 16-bit row/column address)
//!
//! ## Example
//!
//! ```rust
//! use ottendorf_core::{decrypt, encrypt, KeyFile, KeySet};
//!
//! # fn main() -> ottendorf_core::Result<()> {
//! let keys = KeySet::new(vec![
//!     KeyFile::new(1, "alpha.txt", b"Hello there, world".to_vec())?,
//!     KeyFile::new(2, "bravo.txt", b"more key material".to_vec())?,
//! ])?;
//!
//! let payload = encrypt("Hello", &keys, 8)?;
//! assert_eq!(decrypt(&payload, &keys)?, "Hello");
//! # Ok(())
//! # }
//! ```

pub mod bits;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod index;
pub mod keyfile;
pub mod legacy;
pub mod wire;

pub use bits::{BitBuf, MAX_BLOCK_BITS};
pub use decrypt::decrypt;
pub use encrypt::{encrypt, encrypt_with_rng};
pub use error::{CipherError, Result};
pub use index::BlockIndex;
pub use keyfile::{Fingerprint, KeyFile, KeySet, MAX_KEY_FILES, MIN_KEY_FILES};
pub use wire::{Address, CipherPayload, FileEntry, LegacyPayload, MessageEnvelope};
