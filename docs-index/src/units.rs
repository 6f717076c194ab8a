//! UTF-16 code unit helpers.
//!
//! Google Docs measures every index in UTF-16 code units, so flat offsets use
//! the same unit. Rust strings are indexed by byte; these helpers translate.

/// Length of `s` in UTF-16 code units
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte offset of the UTF-16 offset `units` in `text`.
///
/// Returns `None` when `units` is past the end or falls between the two
/// halves of a surrogate pair.
pub fn byte_offset(text: &str, units: usize) -> Option<usize> {
    let mut seen = 0;
    for (byte, ch) in text.char_indices() {
        if seen == units {
            return Some(byte);
        }
        seen += ch.len_utf16();
        if seen > units {
            return None;
        }
    }
    (seen == units).then_some(text.len())
}

/// Largest char-boundary UTF-16 offset at or below `units`, clamped to the
/// length of `text`.
pub fn floor_char_boundary(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for ch in text.chars() {
        let next = seen + ch.len_utf16();
        if next > units {
            return seen;
        }
        seen = next;
    }
    seen
}

/// Converts ascending byte offsets into UTF-16 offsets without rescanning
/// from the start of the text each time.
#[derive(Debug, Clone)]
pub(crate) struct Utf16Cursor<'a> {
    text: &'a str,
    byte: usize,
    units: usize,
}

impl<'a> Utf16Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, byte: 0, units: 0 }
    }

    /// Start the cursor at a known (byte, unit) pair
    pub(crate) fn at(text: &'a str, byte: usize, units: usize) -> Self {
        Self { text, byte, units }
    }

    /// UTF-16 offset of `byte`, which must be a char boundary at or after the
    /// previous call's position.
    pub(crate) fn advance_to(&mut self, byte: usize) -> usize {
        debug_assert!(byte >= self.byte, "cursor moved backwards");
        self.units += utf16_len(&self.text[self.byte..byte]);
        self.byte = byte;
        self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_len_counts_surrogate_pairs() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("é"), 1);
        assert_eq!(utf16_len("😀"), 2);
        assert_eq!(utf16_len("a😀b"), 4);
    }

    #[test]
    fn test_byte_offset() {
        let text = "a😀bé";
        assert_eq!(byte_offset(text, 0), Some(0));
        assert_eq!(byte_offset(text, 1), Some(1));
        assert_eq!(byte_offset(text, 2), None);
        assert_eq!(byte_offset(text, 3), Some(5));
        assert_eq!(byte_offset(text, 4), Some(6));
        assert_eq!(byte_offset(text, 5), Some(text.len()));
        assert_eq!(byte_offset(text, 6), None);
    }

    #[test]
    fn test_floor_char_boundary() {
        let text = "a😀b";
        assert_eq!(floor_char_boundary(text, 0), 0);
        assert_eq!(floor_char_boundary(text, 1), 1);
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(floor_char_boundary(text, 3), 3);
        assert_eq!(floor_char_boundary(text, 4), 4);
        assert_eq!(floor_char_boundary(text, 9), 4);
    }

    #[test]
    fn test_cursor_is_monotonic() {
        let text = "😀x😀y";
        let mut cursor = Utf16Cursor::new(text);
        assert_eq!(cursor.advance_to(4), 2);
        assert_eq!(cursor.advance_to(5), 3);
        assert_eq!(cursor.advance_to(text.len()), 6);
    }
}
