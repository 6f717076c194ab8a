//! Substring search over flat text.
//!
//! Offsets are always measured against the original text. Case-insensitive
//! search runs over a lowercased copy, but every hit is translated back
//! through a position map before it is reported, because lowercasing can
//! change the length of a string ("İ" lowercases to two chars).

use std::borrow::Cow;

use crate::error::{IndexError, Result};
use crate::extract::FlatRange;
use crate::units::{byte_offset, utf16_len, Utf16Cursor};

/// Lowercased text plus, for every original char, where its expansion
/// starts in the folded string and where the char starts in the original.
#[derive(Debug, Clone)]
struct Folded {
    text: String,
    starts: Vec<(usize, usize)>,
    original_len: usize,
}

impl Folded {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut starts = Vec::with_capacity(original.len());
        for (byte, ch) in original.char_indices() {
            starts.push((text.len(), byte));
            text.extend(ch.to_lowercase());
        }
        Self {
            text,
            starts,
            original_len: original.len(),
        }
    }

    /// Original byte for a folded position, if it lies on an original char
    /// boundary.
    fn original(&self, folded: usize) -> Option<usize> {
        if folded == self.text.len() {
            return Some(self.original_len);
        }
        self.starts
            .binary_search_by_key(&folded, |&(f, _)| f)
            .ok()
            .map(|i| self.starts[i].1)
    }
}

/// Char-by-char lowercase, the same mapping `Folded` applies to the text.
/// `str::to_lowercase` is context sensitive (final sigma) and would disagree.
fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

#[derive(Debug, Clone)]
enum Haystack<'a> {
    Exact(&'a str),
    Folded(Folded),
}

/// Lazy iterator over non-overlapping matches, left to right.
///
/// Yields flat ranges in UTF-16 offsets of the full text, even when the scan
/// was restricted to a sub-range.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    haystack: Haystack<'a>,
    needle: Cow<'a, str>,
    pos: usize,
    base: usize,
    cursor: Utf16Cursor<'a>,
}

/// Find every occurrence of `query` in `text`
pub fn find_all<'a>(text: &'a str, query: &'a str, case_sensitive: bool) -> Result<Matches<'a>> {
    let len = utf16_len(text);
    find_all_in(text, query, case_sensitive, FlatRange::new(0, len))
}

/// Find occurrences of `query` lying entirely inside `scan`
pub fn find_all_in<'a>(
    text: &'a str,
    query: &'a str,
    case_sensitive: bool,
    scan: FlatRange,
) -> Result<Matches<'a>> {
    if query.is_empty() {
        return Err(IndexError::InvalidQuery);
    }

    let len = utf16_len(text);
    let out_of_range = |offset| IndexError::OutOfRange { offset, len };
    if scan.start > scan.end {
        return Err(out_of_range(scan.start));
    }
    let start = byte_offset(text, scan.start).ok_or_else(|| out_of_range(scan.start))?;
    let end = byte_offset(text, scan.end).ok_or_else(|| out_of_range(scan.end))?;
    let window = &text[start..end];

    let (haystack, needle) = if case_sensitive {
        (Haystack::Exact(window), Cow::Borrowed(query))
    } else {
        (Haystack::Folded(Folded::new(window)), Cow::Owned(fold(query)))
    };

    Ok(Matches {
        haystack,
        needle,
        pos: 0,
        base: start,
        cursor: Utf16Cursor::at(text, start, scan.start),
    })
}

impl Matches<'_> {
    fn haystack(&self) -> &str {
        match &self.haystack {
            Haystack::Exact(s) => *s,
            Haystack::Folded(f) => f.text.as_str(),
        }
    }

    /// Window-relative original byte range for a haystack hit
    fn original(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        match &self.haystack {
            Haystack::Exact(_) => Some((start, end)),
            Haystack::Folded(f) => Some((f.original(start)?, f.original(end)?)),
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = FlatRange;

    fn next(&mut self) -> Option<FlatRange> {
        loop {
            let hay = self.haystack();
            let found = hay.get(self.pos..)?.find(&*self.needle)?;
            let start = self.pos + found;
            let end = start + self.needle.len();

            match self.original(start, end) {
                Some((orig_start, orig_end)) => {
                    self.pos = end;
                    let flat_start = self.cursor.advance_to(self.base + orig_start);
                    let flat_end = self.cursor.advance_to(self.base + orig_end);
                    return Some(FlatRange::new(flat_start, flat_end));
                }
                None => {
                    // Hit begins or ends inside one char's lowercase expansion
                    let step = hay[start..].chars().next().map_or(1, char::len_utf8);
                    self.pos = start + step;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, query: &str, case_sensitive: bool) -> Vec<(usize, usize)> {
        find_all(text, query, case_sensitive)
            .unwrap()
            .map(|r| (r.start, r.end))
            .collect()
    }

    #[test]
    fn test_case_insensitive_offsets_index_original() {
        let text = "Hello WORLD world";
        let hits = collect(text, "world", false);
        assert_eq!(hits, vec![(6, 11), (12, 17)]);
        assert_eq!(&text[6..11], "WORLD");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(collect("Hello WORLD world", "world", true), vec![(12, 17)]);
        assert_eq!(collect("Hello WORLD world", "World", true), vec![]);
    }

    #[test]
    fn test_non_overlapping() {
        assert_eq!(collect("aaaa", "aa", true), vec![(0, 2), (2, 4)]);
        assert_eq!(collect("abababa", "aba", true), vec![(0, 3), (4, 7)]);
    }

    #[test]
    fn test_empty_query_rejected() {
        assert_eq!(find_all("text", "", true).err(), Some(IndexError::InvalidQuery));
        assert_eq!(find_all("", "", false).err(), Some(IndexError::InvalidQuery));
    }

    #[test]
    fn test_length_changing_fold() {
        // 'İ' (U+0130) lowercases to "i\u{307}": folded text is longer
        let text = "İstanbul istanbul";
        let hits = collect(text, "istanbul", false);
        // The first word folds to "i\u{307}stanbul", which is a different string
        assert_eq!(hits, vec![(9, 17)]);

        let hits = collect(text, "İstanbul", false);
        assert_eq!(hits, vec![(0, 8)]);
    }

    #[test]
    fn test_hit_inside_fold_expansion_is_rejected() {
        // The combining dot exists only in the folded copy of 'İ'
        assert_eq!(collect("İ", "\u{307}", false), vec![]);
        assert_eq!(collect("İ\u{307}", "\u{307}", false), vec![(1, 2)]);
    }

    #[test]
    fn test_final_sigma_matches() {
        // "ΟΔΟΣ" ends in capital sigma; str::to_lowercase would give a final ς
        assert_eq!(collect("ΟΔΟΣ", "ΟΔΟΣ", false), vec![(0, 4)]);
        assert_eq!(collect("ΟΔΟΣ", "οδοσ", false), vec![(0, 4)]);
        assert_eq!(collect("στην ΟΔΟΣ", "ΟΔΟΣ", false), vec![(5, 9)]);
        assert_eq!(collect("ο δρόμος ΔΡΌΜΟΣ", "δρόμοσ", false), vec![(9, 15)]);
    }

    #[test]
    fn test_final_sigma_query_only_matches_final_sigma() {
        // ς and σ are distinct characters after folding
        assert_eq!(collect("οδος ΟΔΟΣ", "οδος", false), vec![(0, 4)]);
    }

    #[test]
    fn test_offsets_are_utf16() {
        let text = "😀 Cat cat";
        assert_eq!(collect(text, "cat", false), vec![(3, 6), (7, 10)]);
    }

    #[test]
    fn test_scan_range_restricts_matches() {
        let text = "cat cat cat";
        let hits: Vec<_> = find_all_in(text, "cat", true, FlatRange::new(2, 11))
            .unwrap()
            .collect();
        assert_eq!(hits, vec![FlatRange::new(4, 7), FlatRange::new(8, 11)]);
    }

    #[test]
    fn test_scan_range_out_of_bounds() {
        assert_eq!(
            find_all_in("abc", "a", true, FlatRange::new(0, 4)).err(),
            Some(IndexError::OutOfRange { offset: 4, len: 3 })
        );
    }

    #[test]
    fn test_restartable_and_cappable() {
        let text = "x x x x";
        let first: Vec<_> = find_all(text, "x", true).unwrap().take(2).collect();
        let again: Vec<_> = find_all(text, "x", true).unwrap().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(again.len(), 4);
        assert_eq!(first[..], again[..2]);
    }
}
