// config.rs: compile-time configuration constants.
//
// The streaming wire format has no header to negotiate parameters, so every
// value here is fixed at build time and shared by encoder and decoder.

pub const KB: usize = 1 << 10;

// Maximum number of uncompressed bytes per streaming block.
// Also the size of each ping-pong staging slot; the previous block must fit
// entirely inside the 64 KB LZ4 back-reference window.
pub const BLOCK_SIZE: usize = 64 * KB;

// Size of the little-endian u32 compressed-length prefix of every frame.
pub const FRAME_HEADER_SIZE: usize = 4;

// Size of the little-endian u32 original-length prefix of a whole-message
// envelope.
pub const LENGTH_HEADER_SIZE: usize = 4;

// Largest input the LZ4 block format accepts (LZ4_MAX_INPUT_SIZE).
pub const MAX_INPUT_SIZE: usize = 0x7E00_0000;

// Worst-case compressed size of one full streaming block.
// Frame lengths above this value cannot come from a conforming encoder.
pub const BOUNDED_BLOCK_SIZE: usize = BLOCK_SIZE + BLOCK_SIZE / 255 + 16;
