//! Block codec capability.
//!
//! The framing and streaming layers never touch a compression algorithm
//! directly.  They need four things from the engine underneath:
//!
//! - [`BlockCodec::compress`] / [`BlockCodec::decompress`]: stateless one-shot
//!   calls over fixed input/output buffers,
//! - [`BlockCodec::compress_bound`]: the worst-case compressed size,
//! - a per-direction history context ([`StreamCompressor`] /
//!   [`StreamDecompressor`]) that is fed the blocks of one stream in order.
//!
//! History contexts do not own the previous block.  The stream owns it in a
//! ping-pong staging slot and lends it to the next call as `window`; the
//! borrow checker then guarantees the window cannot change while the codec
//! reads from it.

pub mod lz4;

pub use self::lz4::{Lz4, Lz4Compressor, Lz4Decompressor};

use crate::error::Result;

/// Stateless block codec plus a factory for its streaming history contexts.
pub trait BlockCodec {
    type Compressor: StreamCompressor;
    type Decompressor: StreamDecompressor;

    /// Worst-case compressed size of a `src_len`-byte block.
    fn compress_bound(&self, src_len: usize) -> usize;

    /// Compresses `src` into `dst`, returning the number of bytes written.
    fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize>;

    /// Decompresses `src` into `dst`, returning the number of bytes written.
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize>;

    /// Creates a fresh encode-side history context.
    fn compressor(&self) -> Self::Compressor;

    /// Creates a fresh decode-side history context.
    fn decompressor(&self) -> Self::Decompressor;
}

/// Encode-side history context.
pub trait StreamCompressor {
    /// Compresses the next block of the stream.
    ///
    /// `window` is the block passed to the previous call (empty for the first
    /// block), unmodified since then.
    fn compress_continue(&mut self, window: &[u8], src: &[u8], dst: &mut [u8]) -> Result<usize>;
}

/// Decode-side history context.
pub trait StreamDecompressor {
    /// Decompresses the next block of the stream into `dst`.
    ///
    /// `window` is the output of the previous call (empty for the first
    /// block), unmodified since then.
    fn decompress_continue(&mut self, window: &[u8], src: &[u8], dst: &mut [u8]) -> Result<usize>;
}
