use crate::{
    Id20, Id32,
    legacy::{LegacyHasher, PendingPiece},
    lengths::PieceLength,
    merkle::{LeafPadding, piece_root},
};

/// A piece being filled with leaves, in file order.
pub struct FillingPiece {
    index: u32,
    piece_length: PieceLength,
    leaves: Vec<Id32>,
    bytes: u64,
}

/// How a piece ended.
#[derive(Debug)]
pub enum ClosedPiece {
    /// Read to exactly the piece length.
    Full { root: Id32, v1: Id20 },
    /// End of file came first. The v1 hash is left to the caller.
    Open { root: Id32, pending: PendingPiece },
}

impl ClosedPiece {
    pub fn root(&self) -> Id32 {
        match self {
            ClosedPiece::Full { root, .. } | ClosedPiece::Open { root, .. } => *root,
        }
    }
}

impl FillingPiece {
    pub fn new(index: u32, piece_length: PieceLength) -> Self {
        Self {
            index,
            piece_length,
            leaves: Vec::with_capacity(piece_length.blocks_per_piece() as usize),
            bytes: 0,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn push_leaf(&mut self, leaf: Id32, block_len: usize) {
        debug_assert!(!self.is_full());
        self.leaves.push(leaf);
        self.bytes += block_len as u64;
    }

    pub fn is_full(&self) -> bool {
        self.bytes >= self.piece_length.get()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[Id32] {
        &self.leaves
    }

    /// Computes the piece root and settles the v1 hash held in `legacy`.
    ///
    /// `legacy` must have seen exactly the bytes of this piece since its
    /// previous piece was closed.
    pub fn close(self, legacy: &mut LegacyHasher, padding: LeafPadding) -> ClosedPiece {
        debug_assert!(!self.is_empty());
        debug_assert_eq!(legacy.piece_bytes(), self.bytes);
        let root = piece_root(
            &self.leaves,
            self.index == 0,
            self.piece_length.blocks_per_piece(),
            padding,
        );
        if self.bytes == self.piece_length.get() {
            ClosedPiece::Full {
                root,
                v1: legacy.close_piece(),
            }
        } else {
            ClosedPiece::Open {
                root,
                pending: legacy.open_piece(self.piece_length.get()),
            }
        }
    }
}
