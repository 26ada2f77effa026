use std::path::Path;
use std::time::Instant;

use crate::common::io::{load_file, open_noatime};

use super::consolidate::merge_counts;
use super::dispatch::{Dispatch, RangeResult, run_all};
use super::error::CountError;
use super::range::{DEFAULT_OVERLAP, partition};
use super::tokenize::WordCounts;

/// Default number of byte ranges a file is split into.
pub const DEFAULT_SEGMENTS: usize = 4;

/// Knobs for one counting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountOptions {
    pub segments: usize,
    /// Read-ahead past each range's owned end, in bytes.
    pub overlap: u64,
    pub dispatch: Dispatch,
    /// Read through a memory map instead of positioned reads.
    pub mmap: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            segments: DEFAULT_SEGMENTS,
            overlap: DEFAULT_OVERLAP,
            dispatch: Dispatch::default(),
            mmap: false,
        }
    }
}

/// Outcome of counting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCounts {
    /// Per-range results, ordered by range id.
    pub segments: Vec<RangeResult>,
    /// Sum of every range's table.
    pub totals: WordCounts,
}

/// Count word frequencies of `path` with `num_segments` concurrent workers
/// and default options otherwise.
pub fn count_file_concurrently(
    path: impl AsRef<Path>,
    num_segments: usize,
) -> Result<FileCounts, CountError> {
    let opts = CountOptions {
        segments: num_segments,
        ..CountOptions::default()
    };
    count_file_with(path, &opts)
}

/// Count word frequencies of `path`.
///
/// The file is opened once and shared read-only by all workers. An empty
/// file is not an error: it yields no ranges and an empty table.
pub fn count_file_with(
    path: impl AsRef<Path>,
    opts: &CountOptions,
) -> Result<FileCounts, CountError> {
    let path = path.as_ref();
    if opts.segments < 1 {
        return Err(CountError::InvalidSegments(opts.segments));
    }

    let started = Instant::now();
    let file = open_noatime(path).map_err(|source| CountError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let size = file
        .metadata()
        .map_err(|source| CountError::Stat {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let ranges = partition(size, opts.segments, opts.overlap)?;
    if ranges.is_empty() {
        tracing::info!(path = %path.display(), "empty file, nothing to count");
        return Ok(FileCounts::default());
    }

    let segments = if opts.mmap {
        let data = load_file(&file, size).map_err(|source| CountError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        run_all(&ranges, &data, opts.dispatch)?
    } else {
        run_all(&ranges, &file, opts.dispatch)?
    };

    let totals = merge_counts(segments.iter().map(|r| &r.counts));
    tracing::info!(
        path = %path.display(),
        bytes = size,
        segments = segments.len(),
        distinct = totals.len(),
        elapsed = ?started.elapsed(),
        "counted file"
    );

    Ok(FileCounts { segments, totals })
}
