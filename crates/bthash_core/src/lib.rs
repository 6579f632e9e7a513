//! Content digests of a single file for use as a torrent identity.
//!
//! One sequential pass over a file yields the BitTorrent v2 (BEP 52) piece
//! layer and file root, the v1 SHA-1 piece hashes, whole-file and head SHA-1
//! digests, and a stable unique id.
//!
//! ```no_run
//! use bthash_core::{HasherOptions, hash_file};
//!
//! let digests = hash_file("some.iso".as_ref(), &HasherOptions::default())?;
//! println!("{} {}", digests.root_string(), digests.unique_id());
//! # Ok::<(), bthash_core::Error>(())
//! ```

pub mod block_reader;
pub mod constants;
pub mod digest_set;
mod error;
pub mod file_hasher;
pub mod hash_id;
pub mod identity;
pub mod legacy;
pub mod lengths;
pub mod merkle;
pub mod piece;

pub use digest_set::{FileDigestSet, LastPiece};
pub use error::{Error, Result};
pub use file_hasher::{HasherOptions, hash_file, hash_reader};
pub use hash_id::{Id20, Id32};
pub use legacy::PendingPiece;
pub use lengths::PieceLength;
pub use merkle::LeafPadding;
