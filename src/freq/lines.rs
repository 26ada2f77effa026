use memchr::memchr_iter;

use super::tokenize::{WordCounts, WordScanner};

/// Counts for one group of whole lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSegmentResult {
    /// Ordinal, 1-based.
    pub id: usize,
    /// Index of the group's first line in the input.
    pub first_line: usize,
    pub line_count: usize,
    pub counts: WordCounts,
}

/// Split a buffer into lines on `\n`. The terminator is dropped; a final
/// line without one is kept, a trailing empty line is not.
pub fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::with_capacity(data.len() / 40 + 1);
    let mut start = 0;
    for pos in memchr_iter(b'\n', data) {
        lines.push(&data[start..pos]);
        start = pos + 1;
    }
    if start < data.len() {
        lines.push(&data[start..]);
    }
    lines
}

/// Divide `lines` into at most `num_segments` contiguous, non-empty groups.
///
/// Groups differ in size by at most one line; the first `len % n` groups
/// take the extra lines. A segment count of 0 is treated as 1.
pub fn partition_lines<T>(lines: &[T], num_segments: usize) -> Vec<&[T]> {
    if lines.is_empty() {
        return Vec::new();
    }
    let n = num_segments.clamp(1, lines.len());
    let per = lines.len() / n;
    let remainder = lines.len() % n;

    let mut groups = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let end = start + per + usize::from(i < remainder);
        groups.push(&lines[start..end]);
        start = end;
    }
    groups
}

/// Count the words of a group of lines. Line ends always separate words.
pub fn count_lines<L: AsRef<[u8]>>(lines: &[L]) -> WordCounts {
    let mut scanner = WordScanner::unbounded();
    for line in lines {
        scanner.feed(line.as_ref());
        scanner.feed(b"\n");
    }
    scanner.finish()
}

/// Partition `lines` and count every group on its own thread.
/// Results are ordered by group id.
pub fn count_line_segments<L>(lines: &[L], num_segments: usize) -> Vec<LineSegmentResult>
where
    L: AsRef<[u8]> + Sync,
{
    let groups = partition_lines(lines, num_segments);

    std::thread::scope(|s| {
        let mut first_line = 0;
        let handles: Vec<_> = groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let first = first_line;
                first_line += group.len();
                let handle = s.spawn(move || count_lines(group));
                (i + 1, first, group.len(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(id, first_line, line_count, handle)| {
                // A panic in a worker resumes here with its original payload.
                let counts = handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                LineSegmentResult {
                    id,
                    first_line,
                    line_count,
                    counts,
                }
            })
            .collect()
    })
}
