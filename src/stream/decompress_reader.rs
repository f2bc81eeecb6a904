//! Pull-style stream decoder serving blocks in place.

use std::io::{self, Read};

use tracing::debug;

use super::{DecoderState, StreamDecoder};
use crate::buffer::Drain;
use crate::codec::{BlockCodec, Lz4};
use crate::config::BLOCK_SIZE;
use crate::error::{Error, Result};

/// Decompresses a framed stream read from `R`.
///
/// A decoded block stays in its staging slot until the caller has read all
/// of it; the next frame always decodes into the other slot, so the pending
/// bytes are served without copying them aside.
///
/// ```
/// use std::io::{Read, Write};
/// use lz4stream::stream::{DecompressReader, Writer};
///
/// let mut w = Writer::new(Vec::new());
/// w.write_all(b"one two three, one two three").unwrap();
/// let wire = w.into_inner();
///
/// let mut out = String::new();
/// DecompressReader::new(&wire[..]).read_to_string(&mut out).unwrap();
/// assert_eq!(out, "one two three, one two three");
/// ```
#[derive(Debug)]
pub struct DecompressReader<R, C: BlockCodec = Lz4> {
    inner: R,
    state: Option<DecoderState<C::Decompressor>>,
    /// Undelivered part of the latest block.
    pending: Drain,
}

impl<R: Read> DecompressReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_codec(inner, Lz4)
    }
}

impl<R: Read, C: BlockCodec> DecompressReader<R, C> {
    pub fn with_codec(inner: R, codec: C) -> Self {
        Self {
            inner,
            state: Some(DecoderState::new(
                codec.decompressor(),
                codec.compress_bound(BLOCK_SIZE),
            )),
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

impl<R: Read, C: BlockCodec> Read for DecompressReader<R, C> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let state = self.state.as_mut().ok_or(Error::Closed)?;
        if dst.is_empty() {
            return Ok(0);
        }

        while self.pending.is_empty() {
            match state.decode_next(&mut self.inner)? {
                None => return Ok(0),
                Some(n) => self.pending = Drain::new(n),
            }
        }
        Ok(self.pending.copy_to(state.latest(), dst))
    }
}

impl<R: Read, C: BlockCodec> StreamDecoder for DecompressReader<R, C> {
    fn close(&mut self) -> Result<()> {
        if let Some(state) = self.state.take() {
            debug!(blocks = state.blocks(), "closed stream decompressor");
            self.pending.clear();
        }
        Ok(())
    }

    fn buffered(&self) -> usize {
        self.pending.remaining()
    }
}
