//! Whole-message codec.
//!
//! Compresses an entire buffer as one independent block behind a 4-byte
//! little-endian prefix holding the *original* length:
//!
//! ```text
//! +-------------------------------+------------------+
//! | original length: u32 LE (4 B) | compressed block |
//! +-------------------------------+------------------+
//! ```
//!
//! An original length of zero is the empty message; decoders that allocate
//! return an empty result without looking at the compressed bytes.

use tracing::trace;

use crate::codec::{BlockCodec, Lz4};
use crate::config::LENGTH_HEADER_SIZE;
use crate::error::{Error, Result};

/// Whole-message codec over any [`BlockCodec`].
///
/// The free functions in this module are shorthands for `Envelope<Lz4>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Envelope<C = Lz4> {
    codec: C,
}

impl<C: BlockCodec> Envelope<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Worst-case encoded size of a `src_len`-byte message.
    pub fn compress_bound(&self, src_len: usize) -> usize {
        self.codec.compress_bound(src_len) + LENGTH_HEADER_SIZE
    }

    /// Encodes `src` into `dst`, returning the number of bytes written
    /// (header included).
    pub fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        if dst.len() < LENGTH_HEADER_SIZE {
            return Err(Error::InsufficientSpace {
                needed: self.compress_bound(src.len()),
                available: dst.len(),
            });
        }
        let stored = u32::try_from(src.len()).map_err(|_| Error::InputTooLarge {
            len: src.len(),
            max: u32::MAX as usize,
        })?;

        let (header, body) = dst.split_at_mut(LENGTH_HEADER_SIZE);
        let n = self.codec.compress(src, body)?;
        header.copy_from_slice(&stored.to_le_bytes());
        trace!(raw = src.len(), compressed = n, "encoded message");
        Ok(LENGTH_HEADER_SIZE + n)
    }

    /// Encodes `src` into a freshly allocated buffer of exactly the encoded
    /// size.
    pub fn compress_to_vec(&self, src: &[u8]) -> Result<Vec<u8>> {
        let mut dst = vec![0u8; self.compress_bound(src.len())];
        let n = self.compress(src, &mut dst)?;
        dst.truncate(n);
        Ok(dst)
    }

    /// Decodes a message into `dst`, returning the decoded size.
    ///
    /// `dst` must be able to hold the stored original length; the decoded
    /// size must equal it.
    pub fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let len = stored_len(src)?;
        if len > dst.len() {
            return Err(Error::InsufficientSpace {
                needed: len,
                available: dst.len(),
            });
        }
        self.decode_exact(&src[LENGTH_HEADER_SIZE..], &mut dst[..len])
    }

    /// Decodes a message into `dst`, growing it when needed.
    ///
    /// `dst` is resized to the original length.  When its capacity is too
    /// small it is replaced by a buffer of exactly that size; otherwise the
    /// existing allocation is reused.  On error `dst` is left in a valid but
    /// unspecified state.
    pub fn decompress_alloc(&self, src: &[u8], dst: &mut Vec<u8>) -> Result<()> {
        let len = stored_len(src)?;
        if len == 0 {
            dst.clear();
            return Ok(());
        }

        if dst.capacity() < len {
            *dst = vec![0u8; len];
        } else {
            dst.clear();
            dst.resize(len, 0);
        }
        self.decode_exact(&src[LENGTH_HEADER_SIZE..], dst)?;
        Ok(())
    }

    /// Decodes a message into a freshly allocated buffer.
    pub fn decompress_to_vec(&self, src: &[u8]) -> Result<Vec<u8>> {
        let mut dst = Vec::new();
        self.decompress_alloc(src, &mut dst)?;
        Ok(dst)
    }

    fn decode_exact(&self, body: &[u8], dst: &mut [u8]) -> Result<usize> {
        let n = self.codec.decompress(body, dst)?;
        if n != dst.len() {
            return Err(Error::MalformedStream(format!(
                "decoded {n} bytes, header says {}",
                dst.len()
            )));
        }
        trace!(compressed = body.len(), raw = n, "decoded message");
        Ok(n)
    }
}

/// Reads the original length stored in an encoded message.
pub fn stored_len(src: &[u8]) -> Result<usize> {
    let header: [u8; LENGTH_HEADER_SIZE] = src
        .get(..LENGTH_HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or(Error::TooShort)?;
    Ok(u32::from_le_bytes(header) as usize)
}

// ─────────────────────────────────────────────────────────────────────────────
// LZ4 shorthands
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case encoded size of a `src_len`-byte message.
pub fn compress_bound_with_header(src_len: usize) -> usize {
    Envelope::<Lz4>::default().compress_bound(src_len)
}

/// Encodes `src` into `dst` behind its original length.
pub fn compress_with_header(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    Envelope::<Lz4>::default().compress(src, dst)
}

/// Encodes `src` into a new buffer of exactly the encoded size.
pub fn compress_to_vec_with_header(src: &[u8]) -> Result<Vec<u8>> {
    Envelope::<Lz4>::default().compress_to_vec(src)
}

/// Decodes a message into the caller's buffer.
pub fn decompress_with_header(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    Envelope::<Lz4>::default().decompress(src, dst)
}

/// Decodes a message into `dst`, reusing its allocation when large enough.
pub fn decompress_alloc_with_header(src: &[u8], dst: &mut Vec<u8>) -> Result<()> {
    Envelope::<Lz4>::default().decompress_alloc(src, dst)
}

/// Decodes a message into a new buffer.
pub fn decompress_to_vec_with_header(src: &[u8]) -> Result<Vec<u8>> {
    Envelope::<Lz4>::default().decompress_to_vec(src)
}
