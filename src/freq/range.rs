use super::error::CountError;

/// Default read-ahead window past each range's owned end.
/// Any run of letters that starts inside a range and is shorter than this
/// is seen whole by the range that owns its first byte.
pub const DEFAULT_OVERLAP: u64 = 64 * 1024;

/// One contiguous byte range of the input, as assigned to a single worker.
///
/// The worker owns word starts in `[start, end)` and may read up to
/// `read_end` to finish a word that crosses `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRange {
    /// Ordinal, 1-based.
    pub id: usize,
    pub start: u64,
    pub end: u64,
    pub read_end: u64,
}

impl FileRange {
    /// Bytes owned by this range.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// First byte the worker reads: one byte before `start`, so it can tell
    /// whether the range opens in the middle of a word.
    #[inline]
    pub fn read_start(&self) -> u64 {
        self.start.saturating_sub(1)
    }

    /// Bytes this range's worker reads, look-behind and overlap included.
    #[inline]
    pub fn read_len(&self) -> u64 {
        self.read_end - self.read_start()
    }
}

/// Split `[0, file_size)` into `num_segments` contiguous ranges.
///
/// Boundaries come from `floor(i * file_size / num_segments)`, so the
/// remainder of an uneven split lands in the later ranges. Every range but
/// the last reads `overlap` extra bytes, capped at `file_size`. When there
/// are fewer bytes than segments, the segment count shrinks so no range is
/// empty; an empty file yields no ranges.
pub fn partition(
    file_size: u64,
    num_segments: usize,
    overlap: u64,
) -> Result<Vec<FileRange>, CountError> {
    if num_segments < 1 {
        return Err(CountError::InvalidSegments(num_segments));
    }
    if file_size == 0 {
        return Ok(Vec::new());
    }

    let n = (num_segments as u64).min(file_size);
    // u128 keeps i * file_size exact for any u64 file size.
    let boundary = |i: u64| ((i as u128 * file_size as u128) / n as u128) as u64;

    let ranges = (0..n)
        .map(|i| {
            let start = boundary(i);
            let end = boundary(i + 1);
            let read_end = if i + 1 == n {
                end
            } else {
                end.saturating_add(overlap).min(file_size)
            };
            FileRange {
                id: i as usize + 1,
                start,
                end,
                read_end,
            }
        })
        .collect();

    Ok(ranges)
}
