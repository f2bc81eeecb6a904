//! Streaming frame format.
//!
//! A stream is a plain concatenation of frames:
//!
//! ```text
//! +----------------------+---------------------------+
//! | length: u32 LE (4 B) | compressed block (length) |
//! +----------------------+---------------------------+
//! ```
//!
//! There is no container header, no checksum and no end-of-stream marker: the
//! stream ends where the transport ends, and that must be on a frame boundary.

use std::io::{self, Read};

use tracing::debug;

use crate::config::FRAME_HEADER_SIZE;
use crate::error::{Error, Result};

/// Encodes a frame length prefix.
#[inline]
pub(crate) fn encode_header(len: usize) -> [u8; FRAME_HEADER_SIZE] {
    debug_assert!(len <= u32::MAX as usize);
    (len as u32).to_le_bytes()
}

/// Decodes a frame length prefix.
#[inline]
pub(crate) fn decode_header(header: [u8; FRAME_HEADER_SIZE]) -> usize {
    u32::from_le_bytes(header) as usize
}

/// Reads the next frame header from `src`.
///
/// Returns `Ok(None)` when `src` is exhausted before the first header byte
/// (clean end of stream).  A header cut short is [`Error::Truncated`]; a
/// length above `max_len` (the codec's bound for one full block, normally
/// [`BOUNDED_BLOCK_SIZE`](crate::config::BOUNDED_BLOCK_SIZE)) is [`Error::MalformedStream`].
pub(crate) fn read_header<R: Read + ?Sized>(src: &mut R, max_len: usize) -> Result<Option<usize>> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    let got = read_up_to(src, &mut header)?;
    if got == 0 {
        return Ok(None);
    }
    if got < FRAME_HEADER_SIZE {
        debug!(got, "stream ended inside a frame header");
        return Err(Error::Truncated {
            expected: FRAME_HEADER_SIZE,
            actual: got,
        });
    }

    let len = decode_header(header);
    if len > max_len {
        debug!(len, max = max_len, "rejected oversized frame");
        return Err(Error::MalformedStream(format!(
            "frame length {len} exceeds block bound {max_len}"
        )));
    }
    Ok(Some(len))
}

/// Reads exactly `buf.len()` payload bytes.
pub(crate) fn read_payload<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<()> {
    let got = read_up_to(src, buf)?;
    if got < buf.len() {
        debug!(expected = buf.len(), got, "stream ended inside a frame payload");
        return Err(Error::Truncated {
            expected: buf.len(),
            actual: got,
        });
    }
    Ok(())
}

fn read_up_to<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<usize> {
    crate::buffer::read_full(src, buf).map_err(Error::Io)
}

/// Writes one frame (header then payload) to `dst`.
///
/// `frame` must already carry the header in its first four bytes; the caller
/// builds header and payload in one buffer so the sink sees a single write.
pub(crate) fn write_frame<W: io::Write + ?Sized>(dst: &mut W, frame: &[u8]) -> Result<()> {
    debug_assert!(frame.len() >= FRAME_HEADER_SIZE);
    dst.write_all(frame).map_err(Error::Io)
}
