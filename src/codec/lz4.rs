//! LZ4 block codec backed by `lz4_flex`.
//!
//! Produces raw LZ4 blocks (no frame header, no checksum).  Linked blocks are
//! encoded against the previous block as an external dictionary, which is the
//! same history model as `LZ4_compress_fast_continue` /
//! `LZ4_decompress_safe_continue` with a double buffer: the window is exactly
//! the previous block, never more.
//!
//! `lz4_flex` insists on an output buffer of at least
//! [`get_maximum_output_size`] bytes, which is looser than
//! [`compress_bound`].  When the caller's destination is between the two,
//! the block is compressed into a scratch buffer first and copied if it fits.

use lz4_flex::block::{
    compress_into, compress_into_with_dict, decompress_into, decompress_into_with_dict,
    get_maximum_output_size,
};
use tracing::trace;

use super::{BlockCodec, StreamCompressor, StreamDecompressor};
use crate::config::MAX_INPUT_SIZE;
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for a given input size.
///
/// Equivalent to `LZ4_COMPRESSBOUND`: `len + len / 255 + 16`.
#[inline]
pub const fn compress_bound(src_len: usize) -> usize {
    src_len + src_len / 255 + 16
}

/// Compresses `src` into `dst` as a single independent block.
///
/// Returns the number of bytes written.  Fails with
/// [`Error::InsufficientSpace`] when `dst` is too small; sizing `dst` with
/// [`compress_bound`] always succeeds.
pub fn compress(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    let mut scratch = Vec::new();
    compress_block(src, dst, &[], &mut scratch)
}

/// Decompresses one independent block from `src` into `dst`.
///
/// `dst` must be large enough for the whole decompressed block; a short
/// destination is reported as [`Error::MalformedStream`], never as a partial
/// result.
pub fn decompress(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    decompress_block(src, dst, &[])
}

fn check_input_size(len: usize) -> Result<()> {
    if len > MAX_INPUT_SIZE {
        return Err(Error::InputTooLarge {
            len,
            max: MAX_INPUT_SIZE,
        });
    }
    Ok(())
}

fn compress_raw(src: &[u8], dst: &mut [u8], dict: &[u8]) -> Result<usize> {
    let available = dst.len();
    let result = if dict.is_empty() {
        compress_into(src, dst)
    } else {
        compress_into_with_dict(src, dst, dict)
    };
    result.map_err(|_| Error::InsufficientSpace {
        needed: compress_bound(src.len()),
        available,
    })
}

fn compress_block(src: &[u8], dst: &mut [u8], dict: &[u8], scratch: &mut Vec<u8>) -> Result<usize> {
    check_input_size(src.len())?;

    let worst = get_maximum_output_size(src.len());
    if dst.len() >= worst {
        return compress_raw(src, dst, dict);
    }

    if scratch.len() < worst {
        scratch.resize(worst, 0);
    }
    let n = compress_raw(src, &mut scratch[..worst], dict)?;
    if n > dst.len() {
        return Err(Error::InsufficientSpace {
            needed: n,
            available: dst.len(),
        });
    }
    dst[..n].copy_from_slice(&scratch[..n]);
    Ok(n)
}

fn decompress_block(src: &[u8], dst: &mut [u8], dict: &[u8]) -> Result<usize> {
    let result = if dict.is_empty() {
        decompress_into(src, dst)
    } else {
        decompress_into_with_dict(src, dst, dict)
    };
    result.map_err(|e| Error::MalformedStream(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Codec and history contexts
// ─────────────────────────────────────────────────────────────────────────────

/// The LZ4 block codec.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Lz4;

impl BlockCodec for Lz4 {
    type Compressor = Lz4Compressor;
    type Decompressor = Lz4Decompressor;

    fn compress_bound(&self, src_len: usize) -> usize {
        compress_bound(src_len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        compress(src, dst)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        decompress(src, dst)
    }

    fn compressor(&self) -> Lz4Compressor {
        Lz4Compressor::default()
    }

    fn decompressor(&self) -> Lz4Decompressor {
        Lz4Decompressor::default()
    }
}

/// Encode-side LZ4 history context.
///
/// Tracks the size of the block it compressed last so that out-of-order use
/// is caught in debug builds, and keeps the scratch buffer used when the
/// destination is tighter than `lz4_flex` accepts.
#[derive(Debug, Default)]
pub struct Lz4Compressor {
    last_block_len: usize,
    blocks: u64,
    scratch: Vec<u8>,
}

impl Lz4Compressor {
    /// Number of blocks compressed through this context.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}

impl StreamCompressor for Lz4Compressor {
    fn compress_continue(&mut self, window: &[u8], src: &[u8], dst: &mut [u8]) -> Result<usize> {
        debug_assert_eq!(
            window.len(),
            self.last_block_len,
            "history window does not match the previous block"
        );
        let n = compress_block(src, dst, window, &mut self.scratch)?;
        self.last_block_len = src.len();
        self.blocks += 1;
        trace!(block = self.blocks, raw = src.len(), compressed = n, window = window.len(), "compressed block");
        Ok(n)
    }
}

/// Decode-side LZ4 history context.
#[derive(Debug, Default)]
pub struct Lz4Decompressor {
    last_block_len: usize,
    blocks: u64,
}

impl Lz4Decompressor {
    /// Number of blocks decompressed through this context.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}

impl StreamDecompressor for Lz4Decompressor {
    fn decompress_continue(&mut self, window: &[u8], src: &[u8], dst: &mut [u8]) -> Result<usize> {
        debug_assert_eq!(
            window.len(),
            self.last_block_len,
            "history window does not match the previous block"
        );
        let n = decompress_block(src, dst, window)?;
        self.last_block_len = n;
        self.blocks += 1;
        trace!(block = self.blocks, compressed = src.len(), raw = n, window = window.len(), "decompressed block");
        Ok(n)
    }
}
