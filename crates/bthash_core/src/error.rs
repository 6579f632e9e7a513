use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("error opening {path:?}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading {} at offset {}", display_source(.path.as_deref()), .offset)]
    Read {
        /// `None` when hashing an arbitrary reader.
        path: Option<PathBuf>,
        offset: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid piece length {0}: must be a power of two between 16384 and 4 GiB")]
    InvalidPieceLength(u64),
}

fn display_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("{path:?}"),
        None => "reader".to_owned(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
