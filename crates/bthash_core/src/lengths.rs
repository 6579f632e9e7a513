use serde::Serialize;

use crate::constants::{BLOCK_SIZE, DEFAULT_PIECE_LENGTH};

const MAX_PIECE_LENGTH: u64 = 4 * 1024 * 1024 * 1024;

const fn is_power_of_two(x: u64) -> bool {
    (x != 0) && ((x & (x - 1)) == 0)
}

pub const fn ceil_div_u64(a: u64, b: u64) -> u64 {
    a.div_ceil(b)
}

pub const fn last_element_size_u64(total: u64, chunk_size: u64) -> u64 {
    let rem = total % chunk_size;
    if rem == 0 {
        return chunk_size;
    }
    rem
}

/// A validated piece length: a power of two, at least one block long.
///
/// Validation happens before any file is touched, so every full piece has a
/// power-of-two number of merkle leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PieceLength(u64);

impl Default for PieceLength {
    fn default() -> Self {
        PieceLength(DEFAULT_PIECE_LENGTH)
    }
}

impl std::fmt::Display for PieceLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PieceLength {
    pub fn new(piece_length: u64) -> crate::Result<Self> {
        if piece_length < BLOCK_SIZE as u64
            || piece_length > MAX_PIECE_LENGTH
            || !is_power_of_two(piece_length)
        {
            return Err(crate::Error::InvalidPieceLength(piece_length));
        }
        Ok(PieceLength(piece_length))
    }

    /// `None` and `Some(0)` both pick [`DEFAULT_PIECE_LENGTH`].
    pub fn resolve(requested: Option<u64>) -> crate::Result<Self> {
        match requested {
            None | Some(0) => Ok(Self::default()),
            Some(l) => Self::new(l),
        }
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub const fn blocks_per_piece(&self) -> u32 {
        (self.0 / BLOCK_SIZE as u64) as u32
    }

    /// Number of pieces a file of `total_length` bytes splits into.
    pub const fn expected_pieces(&self, total_length: u64) -> u64 {
        ceil_div_u64(total_length, self.0)
    }

    pub const fn last_piece_len(&self, total_length: u64) -> u64 {
        if total_length == 0 {
            return 0;
        }
        last_element_size_u64(total_length, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(PieceLength::resolve(None).unwrap().get(), 65536);
        assert_eq!(PieceLength::resolve(Some(0)).unwrap().get(), 65536);
        assert_eq!(PieceLength::resolve(Some(262144)).unwrap().get(), 262144);
    }

    #[test]
    fn test_rejects_bad_piece_lengths() {
        for bad in [1, 8192, 16385, 49152, 3 * 16384, 8 * 1024 * 1024 * 1024] {
            assert!(
                matches!(
                    PieceLength::new(bad),
                    Err(crate::Error::InvalidPieceLength(l)) if l == bad
                ),
                "{bad} should be rejected"
            );
        }
        assert!(PieceLength::new(16384).is_ok());
        assert!(PieceLength::new(4 * 1024 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_blocks_per_piece() {
        assert_eq!(PieceLength::new(16384).unwrap().blocks_per_piece(), 1);
        assert_eq!(PieceLength::default().blocks_per_piece(), 4);
        assert_eq!(PieceLength::new(2097152).unwrap().blocks_per_piece(), 128);
    }

    #[test]
    fn test_piece_counts() {
        let l = PieceLength::new(262144).unwrap();
        assert_eq!(l.expected_pieces(1174243328), 4480);
        assert_eq!(l.last_piece_len(1174243328), 100352);
        assert_eq!(l.expected_pieces(0), 0);
        assert_eq!(l.last_piece_len(0), 0);
        assert_eq!(l.expected_pieces(262144), 1);
        assert_eq!(l.last_piece_len(262144), 262144);
    }
}
