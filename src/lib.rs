// lz4stream: streaming LZ4 block framing with linked-block history.
//
// Two wire formats:
//   - streams: a concatenation of `[u32 LE compressed length][block]` frames,
//     each block coded against the previous one (see `frame`, `stream`);
//   - messages: `[u32 LE original length][block]`, one independent block
//     (see `envelope`).

mod buffer;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
mod frame;
pub mod stream;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use codec::lz4::{compress, compress_bound, decompress};
pub use codec::{BlockCodec, Lz4, StreamCompressor, StreamDecompressor};
pub use config::{BLOCK_SIZE, BOUNDED_BLOCK_SIZE};
pub use envelope::{
    compress_bound_with_header, compress_to_vec_with_header, compress_with_header,
    decompress_alloc_with_header, decompress_to_vec_with_header, decompress_with_header,
    stored_len, Envelope,
};
pub use error::{Error, Result};
pub use stream::{CompressReader, DecompressReader, Reader, StreamDecoder, Writer};
