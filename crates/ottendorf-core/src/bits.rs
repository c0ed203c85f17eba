//! Bit-Packer: canonical bitstream conversion and fixed-width block splitting
//!
//! Every byte buffer has exactly one bitstream representation: its bits in
//! buffer order, most-significant bit first within each byte. Blocks are
//! k-bit slices of that stream, carried as `u32` values so that pattern
//! equality is exact integer equality.

use crate::error::{CipherError, Result};
use bitvec::prelude::*;

/// Maximum supported block width in bits (a block pattern fits a `u32`)
pub const MAX_BLOCK_BITS: u8 = 32;

/// The canonical MSB-first bitstream representation of a byte buffer
pub type BitBuf = BitVec<u8, Msb0>;

/// Check that a block width lies in `1..=32`
pub fn validate_width(width: u8) -> Result<()> {
    if width == 0 || width > MAX_BLOCK_BITS {
        return Err(CipherError::InvalidBlockWidth(width));
    }
    Ok(())
}

/// Convert a byte buffer to its bitstream (8 bits per byte, MSB first)
pub fn bytes_to_bits(bytes: &[u8]) -> BitBuf {
    BitVec::from_slice(bytes)
}

/// Convert a bitstream back to bytes
///
/// The stream length must be a whole number of bytes; callers guarantee this
/// by truncating to a byte-aligned bit length first.
pub fn bits_to_bytes(bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(CipherError::UnalignedBitLength(bits.len() as u64));
    }
    Ok(bits.chunks_exact(8).map(|byte| byte.load_be::<u8>()).collect())
}

/// Split a bitstream into consecutive `width`-bit blocks
///
/// The final block, if shorter than `width`, is right-padded with zero bits.
/// Padding is synthetic: reconstruction discards it via the separately
/// tracked true bit length, since the block values alone cannot distinguish
/// real trailing zeros from padding.
pub fn split_into_blocks(bits: &BitSlice<u8, Msb0>, width: u8) -> Result<Vec<u32>> {
    validate_width(width)?;
    let width = width as usize;
    Ok(bits
        .chunks(width)
        .map(|chunk| {
            let value = chunk.load_be::<u32>();
            value << (width - chunk.len())
        })
        .collect())
}

/// Append the `width` low bits of `value` to a bitstream, MSB first
pub fn push_block(buf: &mut BitBuf, value: u32, width: u8) {
    for i in (0..width).rev() {
        buf.push(value >> i & 1 == 1);
    }
}

/// Number of `width`-bit blocks needed to cover `bit_len` bits
pub fn block_count(bit_len: u64, width: u8) -> u64 {
    bit_len.div_ceil(width as u64)
}

/// Render a block pattern as a fixed-width binary string, for diagnostics
pub fn pattern_string(value: u32, width: u8) -> String {
    format!("{:0width$b}", value, width = width as usize)
}
