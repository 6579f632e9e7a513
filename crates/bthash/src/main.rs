use std::path::{Path, PathBuf};

use anyhow::Context;
use bthash_core::{FileDigestSet, HasherOptions, Id20, LastPiece, LeafPadding, hash_file};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use size_format::SizeFormatterBinary as SF;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Padding {
    /// 32 zero bytes per padding leaf, as BEP 52 specifies.
    Bep52,
    /// SHA-256 of a zero-filled 16 KiB block per padding leaf.
    ZeroBlockDigest,
}

impl From<Padding> for LeafPadding {
    fn from(p: Padding) -> Self {
        match p {
            Padding::Bep52 => LeafPadding::Bep52,
            Padding::ZeroBlockDigest => LeafPadding::ZeroBlockDigest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LastPieceArg {
    /// Leave the trailing partial piece out of the v1 list.
    Omit,
    /// Hash the trailing partial piece zero-padded to a full piece.
    Padded,
    /// Hash only the data of the trailing partial piece.
    Unpadded,
}

impl From<LastPieceArg> for LastPiece {
    fn from(l: LastPieceArg) -> Self {
        match l {
            LastPieceArg::Omit => LastPiece::Omit,
            LastPieceArg::Padded => LastPiece::Padded,
            LastPieceArg::Unpadded => LastPiece::Unpadded,
        }
    }
}

#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// The loglevel
    #[arg(value_enum, short = 'v')]
    log_level: Option<LogLevel>,

    /// Piece length in bytes. A power of two, at least 16384.
    /// 0 picks the default of 65536.
    #[arg(short = 'p', long, env = "BTHASH_PIECE_LENGTH", default_value_t = 0)]
    piece_length: u64,

    /// What padding leaves beyond end of file hash to.
    #[arg(long, value_enum, default_value = "bep52")]
    padding: Padding,

    /// How the v1 hash of a trailing partial piece is produced, if at all.
    #[arg(long, value_enum, default_value = "omit")]
    last_piece: LastPieceArg,

    /// Print one JSON document per file instead of text.
    #[arg(long)]
    json: bool,

    /// The files to hash.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn init_logging(opts: &Opts) {
    let default_rust_log = match opts.log_level.as_ref() {
        Some(level) => match level {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        },
        None => "info",
    };
    let stderr_filter = match std::env::var("RUST_LOG").ok() {
        Some(rust_log) => EnvFilter::builder()
            .parse(&rust_log)
            .expect("can't parse RUST_LOG"),
        None => EnvFilter::builder()
            .parse(default_rust_log)
            .expect("can't parse default_rust_log"),
    };

    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(stderr_filter)
        .init();
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    digests: &'a FileDigestSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_piece_v1: Option<Id20>,
}

fn last_piece_v1(digests: &FileDigestSet, last: LastPiece) -> Option<Id20> {
    let pending = digests.pending_piece()?;
    match last {
        LastPiece::Omit => None,
        LastPiece::Padded => Some(pending.hash_with_padding()),
        LastPiece::Unpadded => Some(pending.hash_without_padding()),
    }
}

fn print_text(path: &Path, digests: &FileDigestSet, last: LastPiece) {
    println!("{}", path.display());
    println!(
        "  length:      {} ({})",
        digests.length(),
        SF::new(digests.length())
    );
    println!("  root:        {}", digests.root_string());
    println!("  sha1:        {}", digests.sha1_string());
    println!("  head sha1:   {}", digests.head_sha1_string());
    println!("  unique id:   {}", digests.unique_id());
    println!(
        "  pieces:      {} x {}",
        digests.piece_layer().len(),
        SF::new(digests.piece_length().get())
    );
    for (idx, v1) in digests.v1_pieces_with(last).iter().enumerate() {
        println!("  v1 piece {idx:>3}: {v1}");
    }
}

fn hash_one(path: &Path, options: &HasherOptions, opts: &Opts) -> anyhow::Result<()> {
    let digests = hash_file(path, options).with_context(|| format!("error hashing {path:?}"))?;
    let last = LastPiece::from(opts.last_piece);
    if opts.json {
        let report = JsonReport {
            digests: &digests,
            last_piece_v1: last_piece_v1(&digests, last),
        };
        println!(
            "{}",
            serde_json::to_string(&report).context("error serializing digests")?
        );
    } else {
        print_text(path, &digests, last);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_logging(&opts);

    let options = HasherOptions::default()
        .with_piece_length(opts.piece_length)
        .with_padding(opts.padding.into());

    let mut failed = 0usize;
    for path in opts.files.iter() {
        if let Err(e) = hash_one(path, &options, &opts) {
            error!("{:#}", e);
            failed += 1;
        }
    }
    info!(files = opts.files.len(), failed, "done");
    if failed > 0 {
        anyhow::bail!("{failed} of {} files could not be hashed", opts.files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opts_parse() {
        let opts = Opts::try_parse_from([
            "bthash",
            "-p",
            "262144",
            "--padding",
            "zero-block-digest",
            "--last-piece",
            "padded",
            "--json",
            "a.bin",
            "b.bin",
        ])
        .unwrap();
        assert_eq!(opts.piece_length, 262144);
        assert!(matches!(opts.padding, Padding::ZeroBlockDigest));
        assert_eq!(opts.last_piece, LastPieceArg::Padded);
        assert!(opts.json);
        assert_eq!(opts.files.len(), 2);
    }

    #[test]
    fn test_opts_require_files() {
        assert!(Opts::try_parse_from(["bthash"]).is_err());
    }

    #[test]
    fn test_last_piece_v1() {
        let digests =
            bthash_core::hash_reader(&b"hello world"[..], &HasherOptions::default()).unwrap();
        assert_eq!(last_piece_v1(&digests, LastPiece::Omit), None);
        assert_eq!(
            last_piece_v1(&digests, LastPiece::Unpadded),
            Some(*digests.sha1())
        );
        assert!(last_piece_v1(&digests, LastPiece::Padded).is_some());
    }
}
