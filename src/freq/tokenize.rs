use std::collections::HashMap;
use std::io::{self, Read};

/// Word → occurrence count. Keys are lowercase runs of ASCII letters.
pub type WordCounts = HashMap<String, u64>;

/// Read buffer for one range worker.
const READ_BUF_SIZE: usize = 32 * 1024;

/// Letter lookup table: `LETTER_TABLE[byte] == 1` for `A-Z` and `a-z`.
/// Everything else (digits, punctuation, whitespace, bytes >= 0x80) separates words.
const fn make_letter_table() -> [u8; 256] {
    let mut t = [0u8; 256];
    let mut b = b'A';
    while b <= b'Z' {
        t[b as usize] = 1;
        t[(b + 32) as usize] = 1;
        b += 1;
    }
    t
}

const LETTER_TABLE: [u8; 256] = make_letter_table();

#[inline]
pub fn is_word_byte(b: u8) -> bool {
    LETTER_TABLE[b as usize] != 0
}

/// Two-state scanner (outside a word / inside a word) over a byte stream
/// that starts at absolute offset `read_start`.
///
/// Bytes may arrive in any number of chunks; a word split across chunks is
/// reassembled. A finished word is counted only when its first byte lies in
/// `[owned_start, owned_end)`.
#[derive(Debug)]
pub struct WordScanner {
    offset: u64,
    owned_start: u64,
    owned_end: u64,
    word_start: Option<u64>,
    word: String,
    counts: WordCounts,
}

impl WordScanner {
    pub fn new(read_start: u64, owned_start: u64, owned_end: u64) -> Self {
        WordScanner {
            offset: read_start,
            owned_start,
            owned_end,
            word_start: None,
            word: String::with_capacity(32),
            counts: WordCounts::new(),
        }
    }

    /// Scanner that owns every word it sees.
    pub fn unbounded() -> Self {
        Self::new(0, 0, u64::MAX)
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        for &b in chunk {
            if is_word_byte(b) {
                if self.word_start.is_none() {
                    self.word_start = Some(self.offset);
                }
                // ASCII letter, so the lowered byte is a valid char.
                self.word.push(b.to_ascii_lowercase() as char);
            } else if self.word_start.is_some() {
                self.flush();
            }
            self.offset += 1;
        }
    }

    /// Flush any word still in progress and return the table.
    pub fn finish(mut self) -> WordCounts {
        self.flush();
        self.counts
    }

    fn flush(&mut self) {
        let Some(start) = self.word_start.take() else {
            return;
        };
        if start >= self.owned_start && start < self.owned_end {
            match self.counts.get_mut(self.word.as_str()) {
                Some(n) => *n += 1,
                None => {
                    self.counts.insert(self.word.clone(), 1);
                }
            }
        }
        self.word.clear();
    }
}

/// Count the words a range owns.
///
/// `reader` must yield the bytes from `read_start` on, in order, up to the
/// range's read end. `read_start` is `owned_start` minus one byte of
/// look-behind (or 0 for the first range): when that byte is a letter, the
/// range opens mid-word and the letters at its start finish a word owned by
/// the previous range, so they are skipped. Words starting in
/// `[owned_start, owned_end)` are counted in full, even when their tail lies
/// in the overlap; words starting at or after `owned_end` belong to the next
/// range. Any read error other than an interrupted call fails the whole range.
pub fn count_range<R: Read>(
    mut reader: R,
    read_start: u64,
    owned_start: u64,
    owned_end: u64,
) -> io::Result<WordCounts> {
    let mut buf = vec![0u8; READ_BUF_SIZE];
    let mut scanner = WordScanner::new(read_start, owned_start, owned_end);

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        scanner.feed(&buf[..n]);
        // Past the owned end with no word open: nothing left to count here.
        if scanner.offset >= owned_end && scanner.word_start.is_none() {
            break;
        }
    }

    Ok(scanner.finish())
}

/// Count every word in an in-memory buffer.
pub fn count_words(data: &[u8]) -> WordCounts {
    let mut scanner = WordScanner::unbounded();
    scanner.feed(data);
    scanner.finish()
}
