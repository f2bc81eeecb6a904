//! Error type shared by the block codec, the envelope and the stream types.
//!
//! Stream types implement [`std::io::Read`] / [`std::io::Write`], so their
//! failures travel as [`io::Error`].  [`Error`] converts into an `io::Error`
//! that keeps the typed value as its payload; [`Error::from_io`] recovers it.

use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Whole-message input is shorter than its 4-byte length header.
    #[error("input too short to contain a length header")]
    TooShort,

    /// The destination buffer cannot hold the result.
    #[error("insufficient space: need {needed} bytes, have {available}")]
    InsufficientSpace {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Input exceeds the largest block the codec accepts.
    #[error("input size {len} exceeds maximum input size {max}")]
    InputTooLarge { len: usize, max: usize },

    /// The codec rejected a block, or a frame/header describes sizes that a
    /// conforming encoder cannot produce.
    #[error("malformed compression stream: {0}")]
    MalformedStream(String),

    /// The source ended inside a frame.
    #[error("stream truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The codec produced no output for a block.
    #[error("error compressing: {0}")]
    Compression(String),

    /// The stream was used after `close()`.
    #[error("stream is closed")]
    Closed,

    /// An earlier error left the stream out of step with its peer; only a
    /// reset or a new stream can continue.
    #[error("stream is unusable after an earlier error")]
    Poisoned,

    /// Source or sink I/O failure, propagated verbatim.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns the typed error carried by an `io::Error` produced by one of
    /// this crate's readers or writers.
    ///
    /// Errors that originated in the wrapped source or sink are returned
    /// unchanged by the stream types and yield `None` here.
    pub fn from_io(err: &io::Error) -> Option<&Error> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<Error>())
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            Error::TooShort | Error::MalformedStream(_) => io::ErrorKind::InvalidData,
            Error::Truncated { .. } => io::ErrorKind::UnexpectedEof,
            Error::InsufficientSpace { .. } | Error::InputTooLarge { .. } => {
                io::ErrorKind::InvalidInput
            }
            Error::Compression(_) | Error::Closed | Error::Poisoned => io::ErrorKind::Other,
            Error::Io(e) => e.kind(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}
