use std::sync::{Mutex, PoisonError};

use super::dispatch::RangeResult;
use super::tokenize::WordCounts;

/// Sum per-range tables into one fresh table.
///
/// Addition is commutative and associative, so the input order never
/// changes the outcome. The inputs are left untouched.
pub fn merge_counts<'a, I>(tables: I) -> WordCounts
where
    I: IntoIterator<Item = &'a WordCounts>,
{
    let mut merged = WordCounts::new();
    for table in tables {
        for (word, &count) in table {
            match merged.get_mut(word.as_str()) {
                Some(total) => *total += count,
                None => {
                    merged.insert(word.clone(), count);
                }
            }
        }
    }
    merged
}

/// Holds the most recently consolidated table for readers on other threads.
///
/// The mutex guards only the swap of the stored table; merging happens
/// outside the lock.
#[derive(Debug, Default)]
pub struct Consolidator {
    last: Mutex<WordCounts>,
}

impl Consolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `results` into a new table, store it in place of the previous
    /// one and return a copy.
    pub fn consolidate(&self, results: &[RangeResult]) -> WordCounts {
        let merged = merge_counts(results.iter().map(|r| &r.counts));
        let copy = merged.clone();
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = merged;
        copy
    }

    /// Copy of the last consolidated table; empty before the first call.
    pub fn snapshot(&self) -> WordCounts {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
