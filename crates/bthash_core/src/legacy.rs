//! BitTorrent v1 style SHA-1 digests, accumulated alongside the merkle leaves.

use sha1w::ISha1;

use crate::{
    Id20,
    constants::{BLOCK_SIZE, HEAD_HASH_WINDOW},
};

static ZEROES: [u8; BLOCK_SIZE as usize] = [0u8; BLOCK_SIZE as usize];

/// Three running SHA-1 accumulators over the raw bytes of a file: the whole
/// file, the first [`HEAD_HASH_WINDOW`] bytes, and the current piece.
#[derive(Clone)]
pub struct LegacyHasher {
    whole: sha1w::Sha1,
    head: sha1w::Sha1,
    head_remaining: u64,
    piece: sha1w::Sha1,
    piece_bytes: u64,
}

impl Default for LegacyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyHasher {
    pub fn new() -> Self {
        Self {
            whole: sha1w::Sha1::new(),
            head: sha1w::Sha1::new(),
            head_remaining: HEAD_HASH_WINDOW,
            piece: sha1w::Sha1::new(),
            piece_bytes: 0,
        }
    }

    pub fn update(&mut self, buf: &[u8]) {
        self.whole.update(buf);
        self.piece.update(buf);
        self.piece_bytes += buf.len() as u64;
        if self.head_remaining > 0 {
            let take = (buf.len() as u64).min(self.head_remaining) as usize;
            self.head.update(&buf[..take]);
            self.head_remaining -= take as u64;
        }
    }

    /// Bytes fed into the current piece so far.
    pub fn piece_bytes(&self) -> u64 {
        self.piece_bytes
    }

    /// Finishes the current piece and starts a new one.
    pub fn close_piece(&mut self) -> Id20 {
        let piece = std::mem::replace(&mut self.piece, sha1w::Sha1::new());
        self.piece_bytes = 0;
        Id20::new(piece.finish())
    }

    /// Hands the current, short piece over without finishing it.
    ///
    /// `piece_length` is the length a full piece would have had.
    pub fn open_piece(&mut self, piece_length: u64) -> PendingPiece {
        debug_assert!(self.piece_bytes < piece_length);
        let piece = std::mem::replace(&mut self.piece, sha1w::Sha1::new());
        let read = std::mem::take(&mut self.piece_bytes);
        PendingPiece {
            hasher: piece,
            read,
            residual: piece_length.saturating_sub(read),
        }
    }

    /// Returns (whole file, head) digests.
    pub fn finish(self) -> (Id20, Id20) {
        (Id20::new(self.whole.finish()), Id20::new(self.head.finish()))
    }
}

/// The SHA-1 state of a file's trailing partial piece.
///
/// Whether the v1 hash of that piece covers zero padding up to a full piece
/// is the caller's choice, so both closings are offered. Each works on a copy
/// of the open state: they can be called repeatedly and in any order.
#[derive(Clone)]
pub struct PendingPiece {
    hasher: sha1w::Sha1,
    read: u64,
    residual: u64,
}

impl std::fmt::Debug for PendingPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPiece")
            .field("read", &self.read)
            .field("residual", &self.residual)
            .finish_non_exhaustive()
    }
}

impl PendingPiece {
    /// Bytes of file data in this piece.
    pub fn len(&self) -> u64 {
        self.read
    }

    pub fn is_empty(&self) -> bool {
        self.read == 0
    }

    /// Zero bytes needed to make this a full piece.
    pub fn residual(&self) -> u64 {
        self.residual
    }

    /// SHA-1 over the piece data followed by `residual` zero bytes.
    pub fn hash_with_padding(&self) -> Id20 {
        let mut h = self.hasher.clone();
        let mut remaining = self.residual;
        while remaining > 0 {
            let chunk = remaining.min(ZEROES.len() as u64) as usize;
            h.update(&ZEROES[..chunk]);
            remaining -= chunk as u64;
        }
        Id20::new(h.finish())
    }

    /// SHA-1 over the piece data only.
    pub fn hash_without_padding(&self) -> Id20 {
        Id20::new(self.hasher.clone().finish())
    }
}
