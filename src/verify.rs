use std::{
    fs::{self, File},
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use log::{debug, warn};

use crate::{
    cli::ValidatorArgs,
    permissions::{report_lines, yes_no_line},
    reverse_in_place, DEFAULT_CHUNK_SIZE,
};

/// Checks whether one file is the byte-for-byte reversal of another.
#[derive(Debug, Clone, Copy)]
pub struct Verifier {
    chunk_size: usize,
}

impl Default for Verifier {
    fn default() -> Self {
        Verifier::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Verifier {
    /// A `chunk_size` of zero is bumped to one.
    pub fn new(chunk_size: usize) -> Self {
        Verifier {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Returns `true` if `candidate` holds exactly the bytes of `original` in
    /// reverse order. Files that cannot be opened count as not reversed.
    pub fn is_reversed(&self, original: &Path, candidate: &Path) -> bool {
        let (mut original_file, mut candidate_file) =
            match (File::open(original), File::open(candidate)) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(err), _) | (_, Err(err)) => {
                    debug!(
                        "cannot compare {} with {}: {err}",
                        original.display(),
                        candidate.display()
                    );
                    return false;
                }
            };
        self.is_reversed_stream(&mut original_file, &mut candidate_file)
    }

    /// Stream variant of [`Verifier::is_reversed`]. Any I/O failure counts as
    /// a mismatch.
    pub fn is_reversed_stream<A: Read + Seek, B: Read + Seek>(
        &self,
        original: &mut A,
        candidate: &mut B,
    ) -> bool {
        match self.compare(original, candidate) {
            Ok(matches) => matches,
            Err(err) => {
                warn!("reversal check stopped by I/O error: {err}");
                false
            }
        }
    }

    fn compare<A: Read + Seek, B: Read + Seek>(
        &self,
        original: &mut A,
        candidate: &mut B,
    ) -> io::Result<bool> {
        let len = original.seek(SeekFrom::End(0))?;
        let candidate_len = candidate.seek(SeekFrom::End(0))?;
        if len != candidate_len {
            debug!("sizes differ: {len} vs {candidate_len}");
            return Ok(false);
        }

        let mut forward = vec![0; self.chunk_size];
        let mut backward = vec![0; self.chunk_size];
        let mut pos = 0;
        while pos < len {
            let n = (len - pos).min(self.chunk_size as u64) as usize;

            original.seek(SeekFrom::Start(pos))?;
            original.read_exact(&mut forward[..n])?;

            candidate.seek(SeekFrom::Start(len - pos - n as u64))?;
            candidate.read_exact(&mut backward[..n])?;
            reverse_in_place(&mut backward[..n]);

            if forward[..n] != backward[..n] {
                warn!("content mismatch in chunk starting at offset {pos}");
                return Ok(false);
            }
            pos += n as u64;
        }
        Ok(true)
    }
}

/// [`Verifier::is_reversed`] with the default chunk size.
pub fn is_reversed(original: &Path, candidate: &Path) -> bool {
    Verifier::default().is_reversed(original, candidate)
}

/// Returns `true` if both paths can be stat-ed and have the same length.
pub fn same_size(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.len() == b.len(),
        _ => false,
    }
}

/// The validator's report: directory, reversal and size checks followed by
/// the permission lines of the new file, the old file and the directory.
/// Checks that cannot be carried out degrade to `No` lines.
pub fn report(args: &ValidatorArgs, verifier: &Verifier) -> Vec<String> {
    let mut lines = vec![
        yes_no_line("Directory is created", args.directory.is_dir()),
        yes_no_line(
            "Whether file contents are reversed in newfile",
            verifier.is_reversed(&args.old_file, &args.new_file),
        ),
        yes_no_line(
            "Both Files Sizes are Same",
            same_size(&args.old_file, &args.new_file),
        ),
    ];
    lines.extend(report_lines(&args.new_file, "newfile"));
    lines.extend(report_lines(&args.old_file, "oldfile"));
    lines.extend(report_lines(&args.directory, "directory"));
    lines
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;
    use crate::{progress::NoProgress, Reverser};

    fn check(chunk_size: usize, original: &[u8], candidate: &[u8]) -> bool {
        Verifier::new(chunk_size)
            .is_reversed_stream(&mut Cursor::new(original), &mut Cursor::new(candidate))
    }

    #[test]
    fn test_detects_reversal() {
        assert!(check(8192, b"hello", b"olleh"));
        assert!(check(2, b"hello", b"olleh"));
        assert!(check(1, b"ab", b"ba"));
    }

    #[test]
    fn test_identity_is_not_reversal() {
        assert!(!check(8192, b"hello", b"hello"));
        assert!(!check(3, b"abcdef", b"abcdef"));
    }

    #[test]
    fn test_palindrome_is_its_own_reversal() {
        assert!(check(2, b"racecar", b"racecar"));
    }

    #[test]
    fn test_size_mismatch() {
        assert!(!check(8192, b"hello", b"olle"));
    }

    #[test]
    fn test_single_byte_difference() {
        let original: Vec<u8> = (0..=255).collect();
        let mut candidate: Vec<u8> = original.iter().rev().copied().collect();
        assert!(check(16, &original, &candidate));
        candidate[200] ^= 0xFF;
        assert!(!check(16, &original, &candidate));
    }

    #[test]
    fn test_empty_files() {
        assert!(check(8192, b"", b""));
    }

    #[test]
    fn test_reverser_output_verifies() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("original.bin");
        let reversed = dir.path().join("reversed.bin");
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 253) as u8).collect();
        fs::write(&original, &data).unwrap();
        Reverser::default()
            .reverse_whole(&original, &reversed, &mut NoProgress)
            .unwrap();

        assert!(is_reversed(&original, &reversed));
        assert!(!is_reversed(&original, &original));
        assert!(same_size(&original, &reversed));
    }

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("present");
        let missing = dir.path().join("missing");
        fs::write(&present, b"x").unwrap();

        assert!(!is_reversed(&present, &missing));
        assert!(!is_reversed(&missing, &present));
        assert!(!same_size(&present, &missing));
    }

    #[test]
    fn test_report_layout() {
        let dir = TempDir::new().unwrap();
        let args = ValidatorArgs {
            new_file: dir.path().join("new"),
            old_file: dir.path().join("old"),
            directory: dir.path().to_path_buf(),
        };
        fs::write(&args.old_file, b"ABCDEFGH").unwrap();
        fs::write(&args.new_file, b"HGFEDCBA").unwrap();

        let lines = report(&args, &Verifier::default());
        assert_eq!(lines.len(), 30);
        assert_eq!(lines[0], yes_no_line("Directory is created", true));
        assert_eq!(
            lines[1],
            yes_no_line("Whether file contents are reversed in newfile", true)
        );
        assert_eq!(lines[2], yes_no_line("Both Files Sizes are Same", true));
        assert!(lines[3].starts_with("User has read permission on newfile"));
        assert!(lines[11].starts_with("Others has execute permission on newfile"));
        assert!(lines[12].starts_with("User has read permission on oldfile"));
        assert!(lines[21].starts_with("User has read permission on directory"));
        assert!(lines[29].starts_with("Others has execute permission on directory"));
    }

    #[test]
    fn test_report_with_missing_paths() {
        let dir = TempDir::new().unwrap();
        let args = ValidatorArgs {
            new_file: dir.path().join("missing"),
            old_file: dir.path().join("old"),
            directory: dir.path().join("no_such_dir"),
        };
        fs::write(&args.old_file, b"ABC").unwrap();

        let lines = report(&args, &Verifier::default());
        assert_eq!(lines.len(), 3 + 1 + 9 + 1);
        assert_eq!(lines[0], yes_no_line("Directory is created", false));
        assert_eq!(
            lines[1],
            yes_no_line("Whether file contents are reversed in newfile", false)
        );
        assert_eq!(lines[2], yes_no_line("Both Files Sizes are Same", false));
        assert_eq!(lines[3], "Could not get permissions for newfile");
        assert!(lines[4].starts_with("User has read permission on oldfile"));
        assert_eq!(lines[13], "Could not get permissions for directory");
    }
}
