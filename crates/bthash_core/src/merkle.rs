//! SHA-256 merkle trees for BEP 52 (BitTorrent v2).
//!
//! Every 16 KiB block of a file is a leaf. Leaves are grouped per piece and
//! reduced into a piece root; the piece roots (the "piece layer") are reduced
//! into the file root.
//!
//! Padding is applied at two levels:
//! - leaf level: a short piece is padded with padding leaves up to a
//!   power-of-two leaf count before its root is computed;
//! - piece level: a piece layer longer than one entry is padded with the
//!   root of a full piece made only of padding leaves.
//!
//! The padding leaf itself is selected by [`LeafPadding`].

use std::{collections::HashMap, sync::LazyLock};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

use crate::{
    Id32,
    constants::BLOCK_SIZE,
    lengths::PieceLength,
};

/// What a leaf beyond end of file hashes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeafPadding {
    /// 32 zero bytes, as BEP 52 specifies.
    #[default]
    Bep52,
    /// SHA-256 of a zero-filled 16 KiB block.
    ZeroBlockDigest,
}

/// BEP 52: padding leaf hashes beyond EOF are all-zero bytes (NOT SHA-256 of zeros).
pub fn zero_hash() -> Id32 {
    Id32::new([0u8; 32])
}

/// SHA-256 hash of a single data block.
pub fn hash_block(data: &[u8]) -> Id32 {
    use sha1w::ISha256;
    let mut h = sha1w::Sha256::new();
    h.update(data);
    Id32::new(h.finish())
}

/// SHA-256(left || right) — internal merkle node hash.
pub fn hash_pair(left: &Id32, right: &Id32) -> Id32 {
    use sha1w::ISha256;
    let mut h = sha1w::Sha256::new();
    h.update(&left.0);
    h.update(&right.0);
    Id32::new(h.finish())
}

static ZERO_BLOCK_DIGEST: LazyLock<Id32> =
    LazyLock::new(|| hash_block(&[0u8; BLOCK_SIZE as usize]));

static PAD_PIECE_HASHES: LazyLock<Mutex<HashMap<(u32, LeafPadding), Id32>>> =
    LazyLock::new(Default::default);

pub fn padding_leaf(padding: LeafPadding) -> Id32 {
    match padding {
        LeafPadding::Bep52 => zero_hash(),
        LeafPadding::ZeroBlockDigest => *ZERO_BLOCK_DIGEST,
    }
}

/// Reduces one tree level at a time until a single hash is left.
///
/// Callers pad to a power of two first. An odd level duplicates its last
/// hash, which only happens when that padding was skipped.
pub fn reduce(mut layer: Vec<Id32>) -> Id32 {
    debug_assert!(!layer.is_empty());
    if layer.is_empty() {
        return zero_hash();
    }
    while layer.len() > 1 {
        if layer.len() % 2 != 0 {
            warn!(
                len = layer.len(),
                "odd merkle level, duplicating last hash; leaves were not padded to a power of two"
            );
            let last = layer[layer.len() - 1];
            layer.push(last);
        }
        let mut next = Vec::with_capacity(layer.len() / 2);
        for pair in layer.chunks_exact(2) {
            next.push(hash_pair(&pair[0], &pair[1]));
        }
        layer = next;
    }
    layer[0]
}

/// How many leaves a piece with `leaf_count` real leaves is reduced over.
///
/// The first piece of a file is padded only up to the next power of two, so a
/// small single-piece file does not grow a full-size tree. Any later piece
/// that is short is the last one and is padded to a full piece.
pub fn leaves_required(leaf_count: usize, is_first_piece: bool, blocks_per_piece: u32) -> usize {
    let bpp = blocks_per_piece as usize;
    if leaf_count == bpp {
        return bpp;
    }
    if is_first_piece {
        leaf_count.next_power_of_two()
    } else {
        bpp
    }
}

/// Computes the root of one piece from its leaf hashes, in file order.
pub fn piece_root(
    leaves: &[Id32],
    is_first_piece: bool,
    blocks_per_piece: u32,
    padding: LeafPadding,
) -> Id32 {
    debug_assert!(!leaves.is_empty() && leaves.len() <= blocks_per_piece as usize);
    let required = leaves_required(leaves.len(), is_first_piece, blocks_per_piece);
    let mut layer: Vec<Id32> = Vec::with_capacity(required.max(leaves.len()));
    layer.extend_from_slice(leaves);
    if layer.len() < required {
        layer.resize(required, padding_leaf(padding));
    }
    reduce(layer)
}

/// The root of a full piece made only of padding leaves.
///
/// Depends only on the piece size and the padding leaf, so it is computed
/// once per combination and cached for the life of the process.
pub fn pad_piece_hash(blocks_per_piece: u32, padding: LeafPadding) -> Id32 {
    let key = (blocks_per_piece, padding);
    if let Some(h) = PAD_PIECE_HASHES.lock().get(&key) {
        return *h;
    }
    let leaf = padding_leaf(padding);
    let hash = if blocks_per_piece <= 1 {
        leaf
    } else {
        reduce(vec![leaf; blocks_per_piece as usize])
    };
    PAD_PIECE_HASHES.lock().insert(key, hash);
    hash
}

/// Rebuilds the file root from the piece layer.
///
/// An empty layer (zero-length file) has no root. A single piece is its own
/// root. Otherwise the layer is padded with [`pad_piece_hash`] up to the next
/// power of two and reduced.
pub fn root_from_piece_layer(
    piece_layer: &[Id32],
    piece_length: PieceLength,
    padding: LeafPadding,
) -> Option<Id32> {
    match piece_layer {
        [] => None,
        [single] => Some(*single),
        _ => {
            let pad_hash = pad_piece_hash(piece_length.blocks_per_piece(), padding);
            let padded_len = piece_layer.len().next_power_of_two();
            let mut layer: Vec<Id32> = Vec::with_capacity(padded_len);
            layer.extend_from_slice(piece_layer);
            layer.resize(padded_len, pad_hash);
            Some(reduce(layer))
        }
    }
}
