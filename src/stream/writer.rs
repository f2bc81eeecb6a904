//! Push-style stream encoder.

use std::io::{self, Write};

use tracing::debug;

use super::EncoderState;
use crate::codec::{BlockCodec, Lz4};
use crate::config::BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::frame;

/// Compresses everything written to it into a framed stream on `W`.
///
/// Input is cut into blocks of at most [`BLOCK_SIZE`] bytes, each coded
/// against the previous block and written to the sink as one frame.  Write
/// boundaries do not matter: the frames depend only on the concatenated
/// input and on how it falls into blocks per call.
///
/// A failed block may already be part of the encoder's history, so after any
/// sink or codec error every later `write` fails ([`Error::Poisoned`] once the
/// original error has been reported) until [`Writer::reset`].
///
/// ```
/// use std::io::Write;
/// use lz4stream::stream::Writer;
///
/// let mut w = Writer::new(Vec::new());
/// w.write_all(b"hello hello hello hello").unwrap();
/// w.close().unwrap();
/// let wire = w.into_inner();
/// assert!(!wire.is_empty());
/// ```
#[derive(Debug)]
pub struct Writer<W, C: BlockCodec = Lz4> {
    inner: W,
    codec: C,
    state: Option<EncoderState<C::Compressor>>,
    /// Error hit after part of a `write` was already accepted.
    deferred: Option<Error>,
    poisoned: bool,
    total_in: u64,
    total_compressed_written: u64,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self::with_codec(inner, Lz4)
    }
}

impl<W: Write, C: BlockCodec> Writer<W, C> {
    pub fn with_codec(inner: W, codec: C) -> Self {
        let state = EncoderState::new(codec.compressor(), codec.compress_bound(BLOCK_SIZE));
        Self {
            inner,
            codec,
            state: Some(state),
            deferred: None,
            poisoned: false,
            total_in: 0,
            total_compressed_written: 0,
        }
    }

    /// Bytes written to the sink so far, frame headers included.
    pub fn total_compressed_written(&self) -> u64 {
        self.total_compressed_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutable access to the sink.  Writing to it directly corrupts the
    /// stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Starts a new logical stream on `inner` and returns the previous sink.
    ///
    /// The history is discarded and the counters restart from zero.  A closed
    /// writer becomes usable again.
    pub fn reset(&mut self, inner: W) -> W {
        match self.state.as_mut() {
            Some(state) => state.reset(self.codec.compressor()),
            None => {
                self.state = Some(EncoderState::new(
                    self.codec.compressor(),
                    self.codec.compress_bound(BLOCK_SIZE),
                ));
            }
        }
        self.deferred = None;
        self.poisoned = false;
        self.total_in = 0;
        self.total_compressed_written = 0;
        std::mem::replace(&mut self.inner, inner)
    }

    /// Releases the history context and the staging buffers, then flushes
    /// the sink.
    ///
    /// No trailer is written.  Calling `close` again does nothing; writes
    /// after it fail with [`Error::Closed`].
    pub fn close(&mut self) -> Result<()> {
        let Some(state) = self.state.take() else {
            return Ok(());
        };
        debug!(
            blocks = state.blocks(),
            raw = self.total_in,
            compressed = self.total_compressed_written,
            "closed stream writer"
        );
        drop(state);
        self.inner.flush().map_err(Error::Io)
    }

    fn write_block(&mut self, block: &[u8]) -> Result<()> {
        let state = self.state.as_mut().ok_or(Error::Closed)?;
        state.stage_mut()[..block.len()].copy_from_slice(block);
        let len = state.encode_staged(block.len())?;
        frame::write_frame(&mut self.inner, &state.frame()[..len])?;
        self.total_in += block.len() as u64;
        self.total_compressed_written += len as u64;
        Ok(())
    }
}

impl<W: Write, C: BlockCodec> Write for Writer<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(err) = self.deferred.take() {
            return Err(err.into());
        }
        if self.state.is_none() {
            return Err(Error::Closed.into());
        }
        if self.poisoned {
            return Err(Error::Poisoned.into());
        }

        let mut consumed = 0usize;
        for block in buf.chunks(BLOCK_SIZE) {
            let Err(err) = self.write_block(block) else {
                consumed += block.len();
                continue;
            };
            self.poisoned = true;
            if consumed == 0 {
                return Err(err.into());
            }
            debug!(consumed, error = %err, "write stopped early");
            self.deferred = Some(err);
            break;
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
