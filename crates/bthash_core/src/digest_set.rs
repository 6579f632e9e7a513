use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    Id20, Id32,
    legacy::PendingPiece,
    lengths::PieceLength,
    merkle::{LeafPadding, pad_piece_hash},
};

/// Which v1 hash, if any, stands in for a trailing partial piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastPiece {
    Omit,
    /// SHA-1 over the data plus zero padding up to a full piece.
    Padded,
    /// SHA-1 over the data only.
    Unpadded,
}

/// Everything computed for one file in a single read pass.
#[derive(Debug, Clone, Serialize)]
pub struct FileDigestSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) path: Option<PathBuf>,
    pub(crate) length: u64,
    pub(crate) piece_length: PieceLength,
    pub(crate) padding: LeafPadding,
    pub(crate) root: Option<Id32>,
    pub(crate) sha1: Id20,
    pub(crate) head_sha1: Id20,
    pub(crate) piece_layer: Vec<Id32>,
    pub(crate) v1_pieces: Vec<Id20>,
    #[serde(skip)]
    pub(crate) pending: Option<PendingPiece>,
    pub(crate) unique_id: String,
}

impl FileDigestSet {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn piece_length(&self) -> PieceLength {
        self.piece_length
    }

    pub fn padding(&self) -> LeafPadding {
        self.padding
    }

    /// The merkle root of the file. `None` for an empty file.
    pub fn root(&self) -> Option<&Id32> {
        self.root.as_ref()
    }

    /// Hex of [`Self::root`], empty for an empty file.
    pub fn root_string(&self) -> String {
        self.root.map(|r| r.as_string()).unwrap_or_default()
    }

    pub fn sha1(&self) -> &Id20 {
        &self.sha1
    }

    pub fn sha1_string(&self) -> String {
        self.sha1.as_string()
    }

    pub fn head_sha1(&self) -> &Id20 {
        &self.head_sha1
    }

    pub fn head_sha1_string(&self) -> String {
        self.head_sha1.as_string()
    }

    /// One piece root per piece, in file order.
    pub fn piece_layer(&self) -> &[Id32] {
        &self.piece_layer
    }

    /// The piece layer as one contiguous byte string.
    pub fn piece_layer_bytes(&self) -> Vec<u8> {
        self.piece_layer.iter().flat_map(|h| h.0).collect()
    }

    /// SHA-1 of every piece read to its full length. A trailing partial
    /// piece is not included, see [`Self::pending_piece`].
    pub fn v1_pieces(&self) -> &[Id20] {
        &self.v1_pieces
    }

    pub fn v1_pieces_bytes(&self) -> Vec<u8> {
        self.v1_pieces.iter().flat_map(|h| h.0).collect()
    }

    /// The trailing partial piece, if the file length is not a multiple of
    /// the piece length.
    pub fn pending_piece(&self) -> Option<&PendingPiece> {
        self.pending.as_ref()
    }

    /// [`Self::v1_pieces`] plus the trailing partial piece closed as `last`
    /// says.
    pub fn v1_pieces_with(&self, last: LastPiece) -> Vec<Id20> {
        let mut pieces = self.v1_pieces.clone();
        if let Some(pending) = &self.pending {
            match last {
                LastPiece::Omit => {}
                LastPiece::Padded => pieces.push(pending.hash_with_padding()),
                LastPiece::Unpadded => pieces.push(pending.hash_without_padding()),
            }
        }
        pieces
    }

    /// The root of a full piece of padding leaves for this piece length.
    pub fn pad_piece_hash(&self) -> Id32 {
        pad_piece_hash(self.piece_length.blocks_per_piece(), self.padding)
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }
}
