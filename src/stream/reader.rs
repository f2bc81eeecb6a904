//! Push-style stream decoder with an owned tail buffer.

use std::io::{self, Read};

use tracing::debug;

use super::{DecoderState, StreamDecoder};
use crate::buffer::Drain;
use crate::codec::{BlockCodec, Lz4};
use crate::config::BLOCK_SIZE;
use crate::error::{Error, Result};

/// Decompresses a framed stream read from `R`.
///
/// When the caller's buffer is smaller than a decoded block, the rest of the
/// block is copied into a tail buffer owned by the reader and served by the
/// following reads before the next frame is touched.  [`DecompressReader`]
/// serves the same bytes without that copy.
///
/// [`DecompressReader`]: super::DecompressReader
#[derive(Debug)]
pub struct Reader<R, C: BlockCodec = Lz4> {
    inner: R,
    state: Option<DecoderState<C::Decompressor>>,
    tail: Vec<u8>,
    pending: Drain,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_codec(inner, Lz4)
    }
}

impl<R: Read, C: BlockCodec> Reader<R, C> {
    pub fn with_codec(inner: R, codec: C) -> Self {
        Self {
            inner,
            state: Some(DecoderState::new(
                codec.decompressor(),
                codec.compress_bound(BLOCK_SIZE),
            )),
            tail: Vec::new(),
            pending: Drain::default(),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, C: BlockCodec> Read for Reader<R, C> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let state = self.state.as_mut().ok_or(Error::Closed)?;
        if dst.is_empty() {
            return Ok(0);
        }
        if !self.pending.is_empty() {
            return Ok(self.pending.copy_to(&self.tail, dst));
        }

        loop {
            match state.decode_next(&mut self.inner)? {
                None => return Ok(0),
                // An empty block carries no bytes; Ok(0) is reserved for EOF.
                Some(0) => continue,
                Some(n) => {
                    let block = state.latest();
                    let k = n.min(dst.len());
                    dst[..k].copy_from_slice(&block[..k]);
                    if k < n {
                        self.tail.clear();
                        self.tail.extend_from_slice(&block[k..]);
                        self.pending = Drain::new(self.tail.len());
                    }
                    return Ok(k);
                }
            }
        }
    }
}

impl<R: Read, C: BlockCodec> StreamDecoder for Reader<R, C> {
    fn close(&mut self) -> Result<()> {
        if let Some(state) = self.state.take() {
            debug!(blocks = state.blocks(), "closed stream reader");
            self.tail = Vec::new();
            self.pending.clear();
        }
        Ok(())
    }

    fn buffered(&self) -> usize {
        self.pending.remaining()
    }
}
