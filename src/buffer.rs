//! Buffer management shared by the stream encoders and decoders.
//!
//! - [`StagingPair`]: the ping-pong pair of fixed-capacity block buffers.
//! - [`Drain`]: a cursor over bytes that were produced but not yet handed to
//!   the caller (a pending tail, or a buffered frame).
//! - [`read_full`]: fill a buffer from a reader, tolerating a short final read.

use std::io::{self, Read};

// ─────────────────────────────────────────────────────────────────────────────
// Ping-pong staging pair
// ─────────────────────────────────────────────────────────────────────────────

/// Two fixed-capacity block buffers used alternately, one per block.
///
/// The slot holding the most recent block is the back-reference window for the
/// next block, which is always produced in the *other* slot.  Both slots are
/// allocated once and never resized, so a block keeps its location for as long
/// as it serves as the window.
#[derive(Debug)]
pub(crate) struct StagingPair {
    slots: [Box<[u8]>; 2],
    filled: [usize; 2],
    /// Slot holding the most recently committed block.
    latest: usize,
}

impl StagingPair {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: [
                vec![0u8; capacity].into_boxed_slice(),
                vec![0u8; capacity].into_boxed_slice(),
            ],
            filled: [0, 0],
            latest: 1,
        }
    }

    /// Capacity of each slot.
    pub(crate) fn capacity(&self) -> usize {
        self.slots[0].len()
    }

    #[inline]
    fn next_index(&self) -> usize {
        self.latest ^ 1
    }

    /// Full-capacity view of the slot that receives the next block.
    pub(crate) fn next_mut(&mut self) -> &mut [u8] {
        let next = self.next_index();
        &mut self.slots[next]
    }

    /// Splits the pair into the slot for the next block and the window (the
    /// latest committed block).
    pub(crate) fn split_next(&mut self) -> (&mut [u8], &[u8]) {
        let window_len = self.filled[self.latest];
        let [a, b] = &mut self.slots;
        let (next, window) = if self.latest == 0 { (b, a) } else { (a, b) };
        (&mut next[..], &window[..window_len])
    }

    /// Marks the next slot as holding a `len`-byte block; it becomes the new
    /// window and the other slot becomes writable.
    pub(crate) fn commit(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        let next = self.next_index();
        self.filled[next] = len;
        self.latest = next;
    }

    /// The latest committed block.
    pub(crate) fn latest(&self) -> &[u8] {
        &self.slots[self.latest][..self.filled[self.latest]]
    }

    /// Forgets both blocks; the next block starts without a window.
    pub(crate) fn clear(&mut self) {
        self.filled = [0, 0];
        self.latest = 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drain cursor
// ─────────────────────────────────────────────────────────────────────────────

/// Position of undelivered bytes inside a buffer owned elsewhere.
///
/// The cursor stores offsets only; the caller lends the backing buffer on
/// every call, which keeps the buffer's owner free of self-references.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Drain {
    pos: usize,
    end: usize,
}

impl Drain {
    pub(crate) fn new(len: usize) -> Self {
        Self { pos: 0, end: len }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Copies as much as fits from `src[pos..end]` into `dst` and advances.
    pub(crate) fn copy_to(&mut self, src: &[u8], dst: &mut [u8]) -> usize {
        let n = self.remaining().min(dst.len());
        dst[..n].copy_from_slice(&src[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reading helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Reads until `buf` is full or the reader reports end of input.
///
/// Returns the number of bytes read; less than `buf.len()` only at end of
/// input.  `Interrupted` is retried, every other error is returned as is.
pub(crate) fn read_full<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0usize;
    while total < buf.len() {
        match src.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
