//! Pull-style stream encoder.

use std::io::{self, Read};

use tracing::debug;

use super::EncoderState;
use crate::buffer::Drain;
use crate::codec::{BlockCodec, Lz4};
use crate::config::BLOCK_SIZE;
use crate::error::{Error, Result};

/// Reading from it yields the framed, compressed form of `R`.
///
/// At most one frame is buffered.  Each time it is drained, up to
/// [`BLOCK_SIZE`] bytes are pulled from the source (a short final read is
/// fine) and compressed against the previous block.
///
/// Bytes pulled before a source error stay staged, so a `read` retried after
/// the error continues the same block without losing input.
#[derive(Debug)]
pub struct CompressReader<R, C: BlockCodec = Lz4> {
    inner: R,
    codec: C,
    state: Option<EncoderState<C::Compressor>>,
    /// Undelivered part of the current frame.
    pending: Drain,
    /// Source bytes staged for the next block so far.
    filled: usize,
    total_compressed_written: u64,
}

impl<R: Read> CompressReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_codec(inner, Lz4)
    }
}

impl<R: Read, C: BlockCodec> CompressReader<R, C> {
    pub fn with_codec(inner: R, codec: C) -> Self {
        let state = EncoderState::new(codec.compressor(), codec.compress_bound(BLOCK_SIZE));
        Self {
            inner,
            codec,
            state: Some(state),
            pending: Drain::default(),
            filled: 0,
            total_compressed_written: 0,
        }
    }

    /// Framed bytes produced so far, whether or not they were read yet.
    pub fn total_compressed_written(&self) -> u64 {
        self.total_compressed_written
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

    /// Starts a new logical stream over `inner` and returns the previous
    /// source.  Any buffered frame bytes are dropped.
    pub fn reset(&mut self, inner: R) -> R {
        match self.state.as_mut() {
            Some(state) => state.reset(self.codec.compressor()),
            None => {
                self.state = Some(EncoderState::new(
                    self.codec.compressor(),
                    self.codec.compress_bound(BLOCK_SIZE),
                ));
            }
        }
        self.pending.clear();
        self.filled = 0;
        self.total_compressed_written = 0;
        std::mem::replace(&mut self.inner, inner)
    }

    /// Releases the history context and buffers.  Idempotent; reads after it
    /// fail with [`Error::Closed`].
    pub fn close(&mut self) -> Result<()> {
        if let Some(state) = self.state.take() {
            debug!(
                blocks = state.blocks(),
                compressed = self.total_compressed_written,
                "closed compress reader"
            );
            self.pending.clear();
            self.filled = 0;
        }
        Ok(())
    }
}

impl<R: Read, C: BlockCodec> Read for CompressReader<R, C> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let state = self.state.as_mut().ok_or(Error::Closed)?;
        if dst.is_empty() {
            return Ok(0);
        }

        if self.pending.is_empty() {
            let slot = state.stage_mut();
            while self.filled < slot.len() {
                match self.inner.read(&mut slot[self.filled..]) {
                    Ok(0) => break,
                    Ok(n) => self.filled += n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        debug!(staged = self.filled, error = %e, "source failed mid-block");
                        return Err(e);
                    }
                }
            }
            if self.filled == 0 {
                return Ok(0);
            }
            let len = state.encode_staged(self.filled)?;
            self.filled = 0;
            self.total_compressed_written += len as u64;
            self.pending = Drain::new(len);
        }
        Ok(self.pending.copy_to(state.frame(), dst))
    }
}
