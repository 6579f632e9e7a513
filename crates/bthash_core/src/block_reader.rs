use std::{
    fs::File,
    io::{ErrorKind, Read},
    path::{Path, PathBuf},
};

use crate::{
    Error,
    constants::BLOCK_SIZE,
};

/// Reads a stream in fixed [`BLOCK_SIZE`] blocks.
///
/// Every block is full except the last one. Short reads from the underlying
/// reader are retried until the block is filled or the stream ends.
pub struct BlockReader<R> {
    reader: R,
    buf: Box<[u8]>,
    path: Option<PathBuf>,
    offset: u64,
    eof: bool,
}

impl BlockReader<File> {
    /// Opens a regular file for a single sequential pass. The handle is
    /// closed when the reader is dropped.
    pub fn open(path: &Path) -> crate::Result<Self> {
        let open_error = |source| Error::FileOpen {
            path: path.to_owned(),
            source,
        };
        let file = File::open(path).map_err(open_error)?;
        let meta = file.metadata().map_err(open_error)?;
        if meta.is_dir() {
            return Err(open_error(std::io::Error::from(ErrorKind::IsADirectory)));
        }
        let mut r = Self::new(file);
        r.path = Some(path.to_owned());
        Ok(r)
    }
}

impl<R: Read> BlockReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0u8; BLOCK_SIZE as usize].into_boxed_slice(),
            path: None,
            offset: 0,
            eof: false,
        }
    }

    /// Total bytes handed out so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the next block, or `None` once the stream is exhausted.
    pub fn next_block(&mut self) -> crate::Result<Option<&[u8]>> {
        if self.eof {
            return Ok(None);
        }
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.reader.read(&mut self.buf[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(size) => filled += size,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(Error::Read {
                        path: self.path.clone(),
                        offset: self.offset + filled as u64,
                        source: e,
                    });
                }
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        self.offset += filled as u64;
        Ok(Some(&self.buf[..filled]))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Hands out at most `max` bytes per read call.
    struct Trickle<R> {
        inner: R,
        max: usize,
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let len = buf.len().min(self.max);
            self.inner.read(&mut buf[..len])
        }
    }

    struct FailAfter {
        remaining: usize,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::other("disk on fire"));
            }
            let len = buf.len().min(self.remaining);
            buf[..len].fill(1);
            self.remaining -= len;
            Ok(len)
        }
    }

    fn collect_lengths<R: Read>(mut r: BlockReader<R>) -> Vec<usize> {
        let mut lengths = Vec::new();
        while let Some(block) = r.next_block().unwrap() {
            lengths.push(block.len());
        }
        lengths
    }

    #[test]
    fn test_last_block_short() {
        let r = BlockReader::new(Cursor::new(vec![7u8; 40000]));
        assert_eq!(collect_lengths(r), vec![16384, 16384, 7232]);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let r = BlockReader::new(Cursor::new(vec![7u8; 32768]));
        assert_eq!(collect_lengths(r), vec![16384, 16384]);
    }

    #[test]
    fn test_empty_stream() {
        let mut r = BlockReader::new(Cursor::new(Vec::new()));
        assert!(r.next_block().unwrap().is_none());
        assert!(r.next_block().unwrap().is_none());
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn test_short_reads_are_coalesced() {
        let data: Vec<u8> = (0..50000u32).map(|i| i as u8).collect();
        let mut r = BlockReader::new(Trickle {
            inner: Cursor::new(data.clone()),
            max: 1000,
        });
        let mut out = Vec::new();
        let mut lengths = Vec::new();
        while let Some(block) = r.next_block().unwrap() {
            lengths.push(block.len());
            out.extend_from_slice(block);
        }
        assert_eq!(lengths, vec![16384, 16384, 16384, 848]);
        assert_eq!(out, data);
        assert_eq!(r.offset(), 50000);
    }

    #[test]
    fn test_read_error_reports_offset() {
        let mut r = BlockReader::new(FailAfter { remaining: 20000 });
        assert!(r.next_block().unwrap().is_some());
        match r.next_block() {
            Err(Error::Read { path, offset, .. }) => {
                assert!(path.is_none());
                assert_eq!(offset, 20000);
            }
            other => panic!("expected a read error, got {:?}", other.map(|b| b.map(|b| b.len()))),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope");
        assert!(matches!(
            BlockReader::open(&path),
            Err(Error::FileOpen { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn test_open_directory_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            BlockReader::open(dir.path()),
            Err(Error::FileOpen { .. })
        ));
    }
}
