//! Line-preferring text chunking

use crate::types::Chunk;

/// Splits text into chunks of at most `max_length` characters.
///
/// Each cut is placed on the last line break inside the window so the break
/// starts the next chunk; without one, the cut is hard at `max_length`.
/// Concatenating the chunks always reproduces the input.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    /// Maximum chunk length in characters
    max_length: usize,
}

impl TextChunker {
    /// Create a new chunker. A zero length is treated as 1.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1),
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Split text into borrowed pieces
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::with_capacity(text.len() / self.max_length + 1);
        let mut rest = text;

        // Byte offset just past the first `max_length` chars; None once the rest fits
        while let Some((window_end, _)) = rest.char_indices().nth(self.max_length) {
            let split_at = match rest[..window_end].rfind('\n') {
                Some(pos) if pos > 0 => pos,
                _ => window_end,
            };

            let (head, tail) = rest.split_at(split_at);
            pieces.push(head);
            rest = tail;
        }

        pieces.push(rest);
        pieces
    }

    /// Split text into indexed chunks with character offsets
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut char_start = 0;

        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let len = piece.chars().count();
                let chunk = Chunk {
                    index,
                    content: piece.to_string(),
                    char_start,
                    char_end: char_start + len,
                };
                char_start += len;
                chunk
            })
            .collect()
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(3000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_text_yields_one_empty_chunk() {
        assert_eq!(TextChunker::new(10).split(""), vec![""]);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = TextChunker::new(10);
        assert_eq!(chunker.split("short"), vec!["short"]);
        assert_eq!(chunker.split("exactly 10"), vec!["exactly 10"]);
    }

    #[test]
    fn test_prefers_line_boundary() {
        let text = "Line one\nLine two\nLine three";
        let pieces = TextChunker::new(12).split(text);

        assert_eq!(pieces, vec!["Line one", "\nLine two", "\nLine three"]);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_long_single_line_is_hard_cut() {
        let text = "x".repeat(10_000);
        let pieces = TextChunker::new(3000).split(&text);

        let lengths: Vec<usize> = pieces.iter().map(|p| p.chars().count()).collect();
        assert_eq!(lengths, vec![3000, 3000, 3000, 1000]);
    }

    #[test]
    fn test_leading_line_break_does_not_stall() {
        let text = "\nabcdef";
        let pieces = TextChunker::new(3).split(text);

        assert_eq!(pieces, vec!["\nab", "cde", "f"]);
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "héllo wörld ünïcode";
        let pieces = TextChunker::new(4).split(text);

        assert!(pieces.iter().all(|p| p.chars().count() <= 4));
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_chunk_offsets() {
        let chunks = TextChunker::new(5).chunk("ab\ncdefgh");

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "ab");
        assert_eq!((chunks[1].char_start, chunks[1].char_end), (2, 7));
        assert_eq!(chunks[2].number(), 3);
        assert_eq!(chunks[2].char_end, 9);
    }

    #[test]
    fn test_zero_length_is_clamped() {
        let chunker = TextChunker::new(0);
        assert_eq!(chunker.max_length(), 1);
        assert_eq!(chunker.split("abc"), vec!["a", "b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_split_is_lossless(text in "(?s).{0,400}", max in 1usize..64) {
            let pieces = TextChunker::new(max).split(&text);
            prop_assert_eq!(pieces.concat(), text);
        }

        #[test]
        fn prop_pieces_respect_max_length(text in "[a-z \n]{0,400}", max in 1usize..64) {
            let pieces = TextChunker::new(max).split(&text);
            for piece in &pieces {
                prop_assert!(piece.chars().count() <= max);
            }
            // Only the last piece may be empty, and only for empty input
            for piece in &pieces[..pieces.len() - 1] {
                prop_assert!(!piece.is_empty());
            }
        }

        #[test]
        fn prop_fitting_text_is_single_chunk(text in "(?s).{0,50}", extra in 0usize..10) {
            let max = text.chars().count().max(1) + extra;
            let pieces = TextChunker::new(max).split(&text);
            prop_assert_eq!(pieces, vec![text.as_str()]);
        }
    }
}
