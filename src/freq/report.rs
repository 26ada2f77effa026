use std::io::{self, Write};

use super::tokenize::WordCounts;

/// Entries ordered by count descending, ties broken by word ascending.
pub fn ranked(counts: &WordCounts) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(w, &c)| (w.as_str(), c)).collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// The `k` highest-ranked entries.
pub fn top(counts: &WordCounts, k: usize) -> Vec<(&str, u64)> {
    let mut entries = ranked(counts);
    entries.truncate(k);
    entries
}

/// Sum of all counts in a table.
pub fn total_occurrences(counts: &WordCounts) -> u64 {
    counts.values().sum()
}

/// Number of decimal digits needed to display a value.
fn num_width(n: u64) -> usize {
    if n == 0 {
        return 1;
    }
    let mut width = 0;
    let mut val = n;
    while val > 0 {
        val /= 10;
        width += 1;
    }
    width
}

/// Write a `RANK  WORD  COUNT` table. Ranks and counts are right-aligned,
/// words left-aligned, all columns sized to their widest value.
pub fn write_ranked(out: &mut impl Write, entries: &[(&str, u64)]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let rank_w = num_width(entries.len() as u64).max("RANK".len());
    let word_w = entries
        .iter()
        .map(|(w, _)| w.len())
        .max()
        .unwrap_or(0)
        .max("WORD".len());
    let count_w = entries
        .iter()
        .map(|&(_, c)| num_width(c))
        .max()
        .unwrap_or(1)
        .max("COUNT".len());

    writeln!(
        out,
        "{:>rank_w$}  {:<word_w$}  {:>count_w$}",
        "RANK", "WORD", "COUNT"
    )?;

    let mut rank_buf = itoa::Buffer::new();
    let mut count_buf = itoa::Buffer::new();
    for (i, &(word, count)) in entries.iter().enumerate() {
        let rank = rank_buf.format(i + 1);
        let count = count_buf.format(count);
        writeln!(out, "{rank:>rank_w$}  {word:<word_w$}  {count:>count_w$}")?;
    }
    Ok(())
}
