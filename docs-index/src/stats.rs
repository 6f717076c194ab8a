use serde::Serialize;

/// Counts reported by `get_word_count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub words: usize,
    /// Characters excluding paragraph breaks
    pub characters: usize,
    pub characters_no_spaces: usize,
    /// Paragraphs containing at least one non-whitespace character
    pub paragraphs: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        words: text.split_whitespace().count(),
        characters: text.chars().filter(|&c| c != '\n').count(),
        characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        paragraphs: text.split('\n').filter(|p| !p.trim().is_empty()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_stats() {
        let stats = text_stats("Hello world\n\nSecond  para here\n");
        assert_eq!(stats.words, 5);
        assert_eq!(stats.characters, 28);
        assert_eq!(stats.characters_no_spaces, 24);
        assert_eq!(stats.paragraphs, 2);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(text_stats(""), TextStats::default());
        assert_eq!(text_stats("\n\n").paragraphs, 0);
    }
}
