use std::{io, path::PathBuf};

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod permissions;
pub mod progress;
pub mod region;
pub mod reverse;
pub mod verify;

pub use region::{Region, RegionError};
pub use reverse::{ensure_dir, Outcome, Reverser};
pub use verify::{is_reversed, same_size, Verifier};

pub const DEFAULT_CHUNK_SIZE: usize = 8192;
pub const DEFAULT_OUTPUT_DIR: &str = "Assignment1";

/// Unix mode of the directory holding reversed files.
pub const OUTPUT_DIR_MODE: u32 = 0o700;
/// Unix mode of a freshly created reversed file.
pub const OUTPUT_FILE_MODE: u32 = 0o600;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open input file {}: {source}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },
    #[error("input {} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },
    #[error("could not read metadata of {}: {source}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },
    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not create output file {}: {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },
    #[error("could not determine stream length: {0}")]
    Length(io::Error),
    #[error("{0}")]
    Region(#[from] RegionError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reverses `buf` in place by swapping byte `i` with byte `len - 1 - i`.
pub fn reverse_in_place(buf: &mut [u8]) {
    let len = buf.len();
    for i in 0..len / 2 {
        buf.swap(i, len - 1 - i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_in_place() {
        let mut even = *b"abcd";
        reverse_in_place(&mut even);
        assert_eq!(&even, b"dcba");

        let mut odd = *b"abcde";
        reverse_in_place(&mut odd);
        assert_eq!(&odd, b"edcba");

        let mut empty: [u8; 0] = [];
        reverse_in_place(&mut empty);
    }

    #[test]
    fn test_error_messages_carry_path() {
        let err = Error::OpenInput {
            path: PathBuf::from("missing.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("could not open input file missing.txt"));
    }
}
