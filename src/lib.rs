#![allow(clippy::len_without_is_empty)]

//! Concurrent word-frequency counting over byte ranges of a file.
//!
//! A file is split into contiguous byte ranges, each range is tokenized on
//! its own worker, and the per-range tables are summed into one. Words are
//! runs of ASCII letters, folded to lowercase.

/// Use mimalloc as the global allocator.
/// Every distinct word is a small heap allocation; mimalloc's thread-local
/// caches keep concurrent workers from contending on the allocator.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod freq;
