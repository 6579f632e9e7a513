/// Merkle leaf granularity. Every block is hashed with SHA-256 on its own.
pub const BLOCK_SIZE: u32 = 16384;

/// The head hash covers at most this many leading bytes of a file.
pub const HEAD_HASH_WINDOW: u64 = 128 * 1024;

/// Piece length used when the caller asks for none (or for less than one byte).
pub const DEFAULT_PIECE_LENGTH: u64 = 65536;
