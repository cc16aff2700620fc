use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("start index {start} is greater than end index {end}")]
    StartAfterEnd { start: u64, end: u64 },
    #[error("end index {end} is beyond the end of the file ({len} bytes)")]
    EndPastLength { end: u64, len: u64 },
}

/// Half-open byte range `[start, end)` inside a file.
///
/// During a partial reversal this is the middle section that is copied
/// verbatim; everything before `start` and from `end` onward gets reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(start: u64, end: u64) -> Self {
        Region { start, end }
    }

    /// Checks `start <= end <= len`.
    pub fn validate(&self, len: u64) -> Result<(), RegionError> {
        if self.start > self.end {
            return Err(RegionError::StartAfterEnd {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > len {
            return Err(RegionError::EndPastLength { end: self.end, len });
        }
        Ok(())
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes outside the region, i.e. the bytes a partial reversal
    /// actually reverses.
    pub fn edges_len(&self, len: u64) -> u64 {
        self.start + len.saturating_sub(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_regions() {
        assert_eq!(Region::new(2, 5).validate(8), Ok(()));
        assert_eq!(Region::new(0, 0).validate(0), Ok(()));
        assert_eq!(Region::new(8, 8).validate(8), Ok(()));
        assert_eq!(Region::new(0, 8).validate(8), Ok(()));
    }

    #[test]
    fn test_start_after_end() {
        assert_eq!(
            Region::new(5, 2).validate(8),
            Err(RegionError::StartAfterEnd { start: 5, end: 2 })
        );
    }

    #[test]
    fn test_end_past_length() {
        assert_eq!(
            Region::new(2, 9).validate(8),
            Err(RegionError::EndPastLength { end: 9, len: 8 })
        );
    }

    #[test]
    fn test_edges_len() {
        let region = Region::new(2, 5);
        assert_eq!(region.len(), 3);
        assert_eq!(region.edges_len(8), 5);
        assert!(Region::new(4, 4).is_empty());
    }
}
