use std::{
    fs::{DirBuilder, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    os::unix::fs::{DirBuilderExt, OpenOptionsExt},
    path::Path,
};

use log::{debug, trace, warn};

use crate::{
    progress::Progress, reverse_in_place, Error, Region, Result, DEFAULT_CHUNK_SIZE,
    OUTPUT_DIR_MODE, OUTPUT_FILE_MODE,
};

/// How a transfer ended when no fatal error occurred.
#[derive(Debug)]
pub enum Outcome {
    /// Every byte of the source was written.
    Complete { written: u64 },
    /// A read or write failed mid-transfer. `written` counts the bytes of the
    /// chunks that were fully written before the failure.
    Interrupted {
        written: u64,
        expected: u64,
        error: io::Error,
    },
}

impl Outcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete { .. })
    }

    pub fn written(&self) -> u64 {
        match self {
            Outcome::Complete { written } | Outcome::Interrupted { written, .. } => *written,
        }
    }
}

/// Creates `dir` with owner-only permissions unless it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    debug!("creating directory {}", dir.display());
    DirBuilder::new()
        .recursive(true)
        .mode(OUTPUT_DIR_MODE)
        .create(dir)
        .map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Chunked byte reverser. One scratch buffer of `chunk_size` bytes is
/// allocated per operation and reused for every chunk.
#[derive(Debug, Clone, Copy)]
pub struct Reverser {
    chunk_size: usize,
}

impl Default for Reverser {
    fn default() -> Self {
        Reverser::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Reverser {
    /// A `chunk_size` of zero is bumped to one.
    pub fn new(chunk_size: usize) -> Self {
        Reverser {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Writes the bytes of `source` to `dest` in reverse order.
    ///
    /// The parent directory of `dest` is created first if needed, and `dest`
    /// itself is created (or truncated) with mode `0600`.
    pub fn reverse_whole(
        &self,
        source: &Path,
        dest: &Path,
        progress: &mut impl Progress,
    ) -> Result<Outcome> {
        let (mut input, len) = open_source(source)?;
        let mut output = create_dest(dest)?;
        debug!(
            "reversing {} ({len} bytes) into {}",
            source.display(),
            dest.display()
        );
        Ok(self.whole(&mut input, &mut output, len, progress))
    }

    /// Writes `reverse(source[..start]) ++ source[start..end] ++ reverse(source[end..])`
    /// to `dest`.
    ///
    /// The region is checked against the length of `source` before `dest` is
    /// touched, so an invalid region never truncates an existing file.
    pub fn reverse_partial(
        &self,
        source: &Path,
        dest: &Path,
        region: Region,
        progress: &mut impl Progress,
    ) -> Result<Outcome> {
        let (mut input, len) = open_source(source)?;
        region.validate(len)?;
        let mut output = create_dest(dest)?;
        debug!(
            "partially reversing {} ({len} bytes, keeping {}..{}) into {}",
            source.display(),
            region.start,
            region.end,
            dest.display()
        );
        Ok(self.partial(&mut input, &mut output, len, region, progress))
    }

    pub fn reverse_whole_stream<R: Read + Seek, W: Write>(
        &self,
        source: &mut R,
        dest: &mut W,
        progress: &mut impl Progress,
    ) -> Result<Outcome> {
        let len = stream_len(source)?;
        Ok(self.whole(source, dest, len, progress))
    }

    pub fn reverse_partial_stream<R: Read + Seek, W: Write>(
        &self,
        source: &mut R,
        dest: &mut W,
        region: Region,
        progress: &mut impl Progress,
    ) -> Result<Outcome> {
        let len = stream_len(source)?;
        region.validate(len)?;
        Ok(self.partial(source, dest, len, region, progress))
    }

    fn whole<R: Read + Seek, W: Write, P: Progress>(
        &self,
        source: &mut R,
        dest: &mut W,
        len: u64,
        progress: &mut P,
    ) -> Outcome {
        let mut transfer = Transfer::new(source, dest, self.chunk_size, len, progress);
        let result = transfer.reversed(0, len).and_then(|()| transfer.flush());
        transfer.finish(result, len)
    }

    fn partial<R: Read + Seek, W: Write, P: Progress>(
        &self,
        source: &mut R,
        dest: &mut W,
        len: u64,
        region: Region,
        progress: &mut P,
    ) -> Outcome {
        let total = region.edges_len(len);
        let mut transfer = Transfer::new(source, dest, self.chunk_size, total, progress);
        let result = transfer
            .reversed(0, region.start)
            .and_then(|()| transfer.verbatim(region.start, region.end))
            .and_then(|()| transfer.reversed(region.end, len))
            .and_then(|()| transfer.flush());
        transfer.finish(result, len)
    }
}

/// State of one transfer: the scratch buffer plus the counters driving the
/// progress observer.
struct Transfer<'a, R, W, P> {
    source: &'a mut R,
    dest: &'a mut W,
    progress: &'a mut P,
    buf: Vec<u8>,
    written: u64,
    reversed: u64,
    total: u64,
}

impl<'a, R: Read + Seek, W: Write, P: Progress> Transfer<'a, R, W, P> {
    fn new(
        source: &'a mut R,
        dest: &'a mut W,
        chunk_size: usize,
        total: u64,
        progress: &'a mut P,
    ) -> Self {
        Transfer {
            source,
            dest,
            progress,
            buf: vec![0; chunk_size],
            written: 0,
            reversed: 0,
            total,
        }
    }

    /// Emits `source[from..to]` back to front, one chunk at a time.
    fn reversed(&mut self, from: u64, to: u64) -> io::Result<()> {
        debug!("reversing bytes {from}..{to}");
        let mut pos = to;
        while pos > from {
            let n = (pos - from).min(self.buf.len() as u64) as usize;
            pos -= n as u64;
            self.source.seek(SeekFrom::Start(pos))?;
            let chunk = &mut self.buf[..n];
            self.source.read_exact(chunk)?;
            reverse_in_place(chunk);
            self.dest.write_all(chunk)?;
            trace!("wrote reversed chunk {pos}..{}", pos + n as u64);
            self.written += n as u64;
            self.reversed += n as u64;
            self.progress.update(self.reversed, self.total);
        }
        Ok(())
    }

    /// Copies `source[from..to]` unchanged.
    fn verbatim(&mut self, from: u64, to: u64) -> io::Result<()> {
        debug!("copying bytes {from}..{to}");
        self.source.seek(SeekFrom::Start(from))?;
        let mut remaining = to - from;
        while remaining > 0 {
            let n = remaining.min(self.buf.len() as u64) as usize;
            let chunk = &mut self.buf[..n];
            self.source.read_exact(chunk)?;
            self.dest.write_all(chunk)?;
            self.written += n as u64;
            remaining -= n as u64;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dest.flush()
    }

    fn finish(self, result: io::Result<()>, expected: u64) -> Outcome {
        match result {
            Ok(()) => Outcome::Complete {
                written: self.written,
            },
            Err(error) => {
                warn!(
                    "transfer interrupted after {} of {expected} bytes: {error}",
                    self.written
                );
                Outcome::Interrupted {
                    written: self.written,
                    expected,
                    error,
                }
            }
        }
    }
}

fn open_source(path: &Path) -> Result<(File, u64)> {
    let file = File::open(path).map_err(|source| Error::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = file.metadata().map_err(|source| Error::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok((file, metadata.len()))
}

fn create_dest(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_FILE_MODE)
        .open(path)
        .map_err(|source| Error::CreateOutput {
            path: path.to_path_buf(),
            source,
        })
}

fn stream_len<S: Seek>(stream: &mut S) -> Result<u64> {
    let len = stream.seek(SeekFrom::End(0)).map_err(Error::Length)?;
    stream.seek(SeekFrom::Start(0)).map_err(Error::Length)?;
    Ok(len)
}
