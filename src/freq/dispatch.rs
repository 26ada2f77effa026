use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;

use rayon::prelude::*;

use crate::common::io::{ByteSource, SectionReader};

use super::error::CountError;
use super::range::FileRange;
use super::tokenize::{WordCounts, count_range};

/// How range workers are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// One scoped OS thread per range.
    #[default]
    Threads,
    /// One task per range on the global rayon pool.
    Pool,
}

/// Counts produced by the worker of one range. Never mutated after the
/// worker hands it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeResult {
    pub id: usize,
    pub start: u64,
    pub end: u64,
    pub counts: WordCounts,
}

impl RangeResult {
    /// Total word occurrences owned by this range.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Count one range through its own positioned reader.
fn run_one<S: ByteSource + ?Sized>(
    range: &FileRange,
    source: &S,
) -> Result<RangeResult, CountError> {
    let started = Instant::now();
    tracing::debug!(
        segment = range.id,
        start = range.start,
        end = range.end,
        read_end = range.read_end,
        "counting segment"
    );

    let read_start = range.read_start();
    let reader = SectionReader::new(source, read_start, range.read_end);
    let counts = count_range(reader, read_start, range.start, range.end)
        .map_err(|source| CountError::Range { id: range.id, source })?;

    tracing::debug!(
        segment = range.id,
        distinct = counts.len(),
        elapsed = ?started.elapsed(),
        "segment done"
    );
    Ok(RangeResult {
        id: range.id,
        start: range.start,
        end: range.end,
        counts,
    })
}

/// Count every range concurrently and wait for all of them.
///
/// Workers share `source` read-only and each fills a private table. The
/// results come back ordered by range id whatever the completion order.
/// If any worker fails, the whole call fails with the error of the
/// lowest-numbered failing range and no results are returned.
pub fn run_all<S: ByteSource + ?Sized>(
    ranges: &[FileRange],
    source: &S,
    dispatch: Dispatch,
) -> Result<Vec<RangeResult>, CountError> {
    let outcomes: Vec<(usize, Result<RangeResult, CountError>)> = match dispatch {
        Dispatch::Threads => thread::scope(|s| {
            let handles: Vec<_> = ranges
                .iter()
                .map(|range| {
                    let spawned = thread::Builder::new()
                        .name(format!("segment-{}", range.id))
                        .spawn_scoped(s, move || run_one(range, source));
                    (range.id, spawned)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, spawned)| (id, join_spawned(id, spawned)))
                .collect()
        }),
        Dispatch::Pool => ranges
            .par_iter()
            .map(|range| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_one(range, source)))
                    .unwrap_or_else(|_| Err(CountError::WorkerPanicked { id: range.id }));
                (range.id, outcome)
            })
            .collect(),
    };

    settle(outcomes)
}

/// Wait for a worker that may never have started.
///
/// A refused spawn becomes [`CountError::Spawn`] and a panic becomes
/// [`CountError::WorkerPanicked`], both tagged with the range id.
pub(super) fn join_spawned<T>(
    id: usize,
    spawned: io::Result<ScopedJoinHandle<'_, Result<T, CountError>>>,
) -> Result<T, CountError> {
    match spawned {
        Ok(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(CountError::WorkerPanicked { id })),
        Err(source) => {
            tracing::warn!(segment = id, error = %source, "could not start worker");
            Err(CountError::Spawn { id, source })
        }
    }
}

/// Order outcomes by range id and fail on the first error in that order.
fn settle(
    mut outcomes: Vec<(usize, Result<RangeResult, CountError>)>,
) -> Result<Vec<RangeResult>, CountError> {
    outcomes.sort_by_key(|(id, _)| *id);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
