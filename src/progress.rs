use std::io::Write;

const BAR_WIDTH: u64 = 50;

/// Observer notified after every chunk of a transfer.
pub trait Progress {
    fn update(&mut self, done: u64, total: u64);
}

/// Ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _done: u64, _total: u64) {}
}

impl<F: FnMut(u64, u64)> Progress for F {
    fn update(&mut self, done: u64, total: u64) {
        self(done, total)
    }
}

/// Single-line text progress bar, redrawn in place with a carriage return.
pub struct ProgressBar<W: Write> {
    out: W,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W) -> Self {
        ProgressBar { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Ends the bar's line so later output starts on a fresh one.
    pub fn finish(&mut self) {
        let _ = writeln!(self.out);
    }
}

impl<W: Write> Progress for ProgressBar<W> {
    fn update(&mut self, done: u64, total: u64) {
        if total == 0 {
            return;
        }
        let done = done.min(total);
        let percent = done * 100 / total;
        let filled = (percent * BAR_WIDTH / 100) as usize;
        let empty = BAR_WIDTH as usize - filled;
        // Rendering failures must not affect the transfer.
        let _ = write!(
            self.out,
            "\r[{}{}] {percent:>3}% ({done}/{total} bytes)",
            "#".repeat(filled),
            "-".repeat(empty),
        );
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = vec![];
        let mut observer = |done: u64, total: u64| seen.push((done, total));
        observer.update(1, 4);
        observer.update(4, 4);
        assert_eq!(seen, [(1, 4), (4, 4)]);
    }

    #[test]
    fn test_bar_rendering() {
        let mut bar = ProgressBar::new(Vec::new());
        bar.update(50, 100);
        let out = String::from_utf8(bar.into_inner()).unwrap();
        let expected = format!("\r[{}{}]  50% (50/100 bytes)", "#".repeat(25), "-".repeat(25));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_bar_ignores_empty_total() {
        let mut bar = ProgressBar::new(Vec::new());
        bar.update(0, 0);
        assert!(bar.into_inner().is_empty());
    }
}
