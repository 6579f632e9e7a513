use std::{fs::File, io::Read, path::Path};

use tracing::{debug, debug_span, trace, warn};

use crate::{
    block_reader::BlockReader,
    digest_set::FileDigestSet,
    identity::unique_id,
    legacy::LegacyHasher,
    lengths::PieceLength,
    merkle::{LeafPadding, hash_block, root_from_piece_layer},
    piece::{ClosedPiece, FillingPiece},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct HasherOptions {
    /// `None` or `Some(0)` picks the default of 64 KiB.
    pub piece_length: Option<u64>,
    pub padding: LeafPadding,
}

impl HasherOptions {
    pub fn with_piece_length(mut self, piece_length: u64) -> Self {
        self.piece_length = Some(piece_length);
        self
    }

    pub fn with_padding(mut self, padding: LeafPadding) -> Self {
        self.padding = padding;
        self
    }
}

/// Hashes the file at `path` in one sequential pass.
pub fn hash_file(path: &Path, options: &HasherOptions) -> crate::Result<FileDigestSet> {
    let piece_length = PieceLength::resolve(options.piece_length)?;
    let _span = debug_span!("hash_file", ?path, %piece_length).entered();
    let reader = BlockReader::<File>::open(path)?;
    hash_blocks(reader, piece_length, options.padding)
}

/// Hashes everything `reader` yields until end of stream.
pub fn hash_reader<R: Read>(reader: R, options: &HasherOptions) -> crate::Result<FileDigestSet> {
    let piece_length = PieceLength::resolve(options.piece_length)?;
    let _span = debug_span!("hash_reader", %piece_length).entered();
    hash_blocks(BlockReader::new(reader), piece_length, options.padding)
}

fn hash_blocks<R: Read>(
    mut reader: BlockReader<R>,
    piece_length: PieceLength,
    padding: LeafPadding,
) -> crate::Result<FileDigestSet> {
    let mut legacy = LegacyHasher::new();
    let mut piece_layer = Vec::new();
    let mut v1_pieces = Vec::new();
    let mut pending = None;

    loop {
        let mut piece = FillingPiece::new(piece_layer.len() as u32, piece_length);
        while !piece.is_full() {
            let Some(block) = reader.next_block()? else {
                break;
            };
            legacy.update(block);
            piece.push_leaf(hash_block(block), block.len());
        }
        if piece.is_empty() {
            break;
        }

        let index = piece.index();
        match piece.close(&mut legacy, padding) {
            ClosedPiece::Full { root, v1 } => {
                trace!(index, ?root, ?v1, "piece closed");
                piece_layer.push(root);
                v1_pieces.push(v1);
            }
            ClosedPiece::Open { root, pending: p } => {
                trace!(index, ?root, len = p.len(), residual = p.residual(), "piece left open");
                piece_layer.push(root);
                pending = Some(p);
                break;
            }
        }
    }

    let length = reader.offset();
    let path = reader.path().map(|p| p.to_owned());
    drop(reader);

    let (sha1, head_sha1) = legacy.finish();
    let root = root_from_piece_layer(&piece_layer, piece_length, padding);

    let expected_pieces = piece_length.expected_pieces(length);
    if piece_layer.len() as u64 != expected_pieces {
        warn!(
            pieces = piece_layer.len(),
            expected_pieces, length, "piece count does not match file length"
        );
    }
    debug!(length, pieces = piece_layer.len(), "hashed");

    Ok(FileDigestSet {
        unique_id: unique_id(length, root.as_ref()),
        path,
        length,
        piece_length,
        padding,
        root,
        sha1,
        head_sha1,
        piece_layer,
        v1_pieces,
        pending,
    })
}
