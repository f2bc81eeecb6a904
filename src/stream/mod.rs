//! Streaming compression over `io::Read` / `io::Write`.
//!
//! Every stream type in this module speaks the same wire format (one
//! `[u32 LE length][block]` frame per block) and keeps the same history
//! discipline: a block is staged in one slot of a ping-pong pair and coded
//! against the block in the other slot, so the window is always exactly the
//! previous block of the stream.
//!
//! | type                   | direction  | driven by      |
//! |------------------------|------------|----------------|
//! | [`Writer`]             | compress   | caller writes  |
//! | [`CompressReader`]     | compress   | caller reads   |
//! | [`Reader`]             | decompress | caller reads   |
//! | [`DecompressReader`]   | decompress | caller reads   |
//!
//! [`Reader`] copies the undelivered remainder of a block into a buffer of
//! its own; [`DecompressReader`] serves it in place from the staging slot.

mod compress_reader;
mod decompress_reader;
mod reader;
mod writer;

pub use self::compress_reader::CompressReader;
pub use self::decompress_reader::DecompressReader;
pub use self::reader::Reader;
pub use self::writer::Writer;

use std::io::Read;

use tracing::{debug, trace};

use crate::buffer::StagingPair;
use crate::codec::{StreamCompressor, StreamDecompressor};
use crate::config::{BLOCK_SIZE, FRAME_HEADER_SIZE};
use crate::error::{Error, Result};
use crate::frame;

/// Capability shared by the two decoder variants.
///
/// Pick the variant at construction; code that only needs to drain a stream
/// can be written against this trait.
pub trait StreamDecoder: Read {
    /// Releases the history context and every buffer.  Idempotent; reads
    /// after the first call fail with [`Error::Closed`].
    fn close(&mut self) -> Result<()>;

    /// Decompressed bytes already produced but not yet returned by `read`.
    fn buffered(&self) -> usize;
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode side
// ─────────────────────────────────────────────────────────────────────────────

/// History context, staging pair and frame buffer of one encoding stream.
#[derive(Debug)]
pub(crate) struct EncoderState<H> {
    history: H,
    staging: StagingPair,
    /// Header followed by room for one worst-case compressed block.
    frame: Box<[u8]>,
    blocks: u64,
}

impl<H: StreamCompressor> EncoderState<H> {
    pub(crate) fn new(history: H, block_bound: usize) -> Self {
        Self {
            history,
            staging: StagingPair::new(BLOCK_SIZE),
            frame: vec![0u8; FRAME_HEADER_SIZE + block_bound].into_boxed_slice(),
            blocks: 0,
        }
    }

    /// Starts a new logical stream on the same buffers.
    pub(crate) fn reset(&mut self, history: H) {
        self.history = history;
        self.staging.clear();
        self.blocks = 0;
    }

    /// Slot that the next block must be staged into.
    pub(crate) fn stage_mut(&mut self) -> &mut [u8] {
        self.staging.next_mut()
    }

    /// Compresses the first `len` staged bytes against the previous block and
    /// frames the result.  Returns the frame length (header included); the
    /// frame is then available from [`Self::frame`].
    pub(crate) fn encode_staged(&mut self, len: usize) -> Result<usize> {
        let (next, window) = self.staging.split_next();
        let n = self.history.compress_continue(
            window,
            &next[..len],
            &mut self.frame[FRAME_HEADER_SIZE..],
        )?;
        if n == 0 {
            return Err(Error::Compression(format!(
                "codec produced no output for a {len}-byte block"
            )));
        }

        self.frame[..FRAME_HEADER_SIZE].copy_from_slice(&frame::encode_header(n));
        self.staging.commit(len);
        self.blocks += 1;
        trace!(block = self.blocks, raw = len, framed = FRAME_HEADER_SIZE + n, "framed block");
        Ok(FRAME_HEADER_SIZE + n)
    }

    /// The frame buffer; its first `encode_staged` bytes hold the last frame.
    pub(crate) fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub(crate) fn blocks(&self) -> u64 {
        self.blocks
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode side
// ─────────────────────────────────────────────────────────────────────────────

/// History context, staging pair and payload buffer of one decoding stream.
#[derive(Debug)]
pub(crate) struct DecoderState<H> {
    history: H,
    staging: StagingPair,
    compressed: Box<[u8]>,
    blocks: u64,
    /// Set once a frame failed part-way; the source position is then unknown.
    poisoned: bool,
}

impl<H: StreamDecompressor> DecoderState<H> {
    pub(crate) fn new(history: H, block_bound: usize) -> Self {
        Self {
            history,
            staging: StagingPair::new(BLOCK_SIZE),
            compressed: vec![0u8; block_bound].into_boxed_slice(),
            blocks: 0,
            poisoned: false,
        }
    }

    /// Reads and decodes the next frame from `src`.
    ///
    /// Returns the decoded block size, or `None` at a clean end of stream.
    /// The block is available from [`Self::latest`] and stays untouched until
    /// the following call.  After any error every later call fails with
    /// [`Error::Poisoned`].
    pub(crate) fn decode_next<R: Read + ?Sized>(&mut self, src: &mut R) -> Result<Option<usize>> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        let decoded = self.read_frame(src);
        self.poisoned = decoded.is_err();
        decoded
    }

    fn read_frame<R: Read + ?Sized>(&mut self, src: &mut R) -> Result<Option<usize>> {
        let Some(len) = frame::read_header(src, self.compressed.len())? else {
            return Ok(None);
        };
        let payload = &mut self.compressed[..len];
        frame::read_payload(src, payload)?;

        let (next, window) = self.staging.split_next();
        let n = self
            .history
            .decompress_continue(window, &self.compressed[..len], next)
            .inspect_err(|e| debug!(block = self.blocks + 1, len, error = %e, "rejected frame"))?;
        self.staging.commit(n);
        self.blocks += 1;
        Ok(Some(n))
    }

    /// The most recently decoded block.
    pub(crate) fn latest(&self) -> &[u8] {
        self.staging.latest()
    }

    pub(crate) fn blocks(&self) -> u64 {
        self.blocks
    }
}
