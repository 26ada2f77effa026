use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::common::io_error_msg;

/// Everything that can stop a counting run.
///
/// Configuration problems are reported before any I/O happens; I/O problems
/// identify the file or the range that failed. I/O causes are rendered
/// without the "(os error N)" suffix.
#[derive(Debug, Error)]
pub enum CountError {
    #[error("segments must be >= 1 (got {0})")]
    InvalidSegments(usize),

    #[error("cannot open '{}': {}", .path.display(), io_error_msg(.source))]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot stat '{}': {}", .path.display(), io_error_msg(.source))]
    Stat { path: PathBuf, source: io::Error },

    /// Loading the whole file for the mapped path failed. A refused mapping
    /// falls back to reading, so this is always a read failure.
    #[error("cannot read '{}': {}", .path.display(), io_error_msg(.source))]
    Load { path: PathBuf, source: io::Error },

    #[error("segment {id}: read error: {}", io_error_msg(.source))]
    Range { id: usize, source: io::Error },

    #[error("segment {id}: cannot start worker: {}", io_error_msg(.source))]
    Spawn { id: usize, source: io::Error },

    #[error("segment {id}: worker panicked")]
    WorkerPanicked { id: usize },
}

impl CountError {
    /// Range id a failure belongs to, if it came from a worker.
    pub fn range_id(&self) -> Option<usize> {
        match self {
            CountError::Range { id, .. }
            | CountError::Spawn { id, .. }
            | CountError::WorkerPanicked { id } => Some(*id),
            _ => None,
        }
    }
}
