//! Splits an input line into words.
//!
//! There is no quoting or escaping: every delimiter character ends a word,
//! even one the user meant to be part of an argument.

use crate::reader::Line;

/// Characters that separate words: space, tab, carriage return, newline, bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Slots reserved for tokens before the first word is pushed.
pub const INITIAL_TOKENS: usize = 64;

/// The words of one [`Line`], borrowed from it.
///
/// The lifetime ties every token to the line it was cut from, so the
/// sequence can never outlive its line. Positional access past the last
/// word yields `None`, which plays the role of the end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'line> {
    words: Vec<&'line str>,
}

impl<'line> Tokens<'line> {
    /// Token at `index`, or `None` once the sequence is exhausted.
    pub fn get(&self, index: usize) -> Option<&'line str> {
        self.words.get(index).copied()
    }

    /// The command word, if the line had any words at all.
    pub fn command(&self) -> Option<&'line str> {
        self.get(0)
    }

    pub fn as_slice(&self) -> &[&'line str] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'line str> + '_ {
        self.words.iter().copied()
    }
}

/// Split `line` on runs of [`DELIMITERS`].
pub fn tokenize(line: &Line) -> Tokens<'_> {
    split_words(line.as_str())
}

/// Split raw text on runs of [`DELIMITERS`]; empty words are never produced.
pub fn split_words(text: &str) -> Tokens<'_> {
    let mut words = Vec::with_capacity(INITIAL_TOKENS);
    // Pushing past capacity doubles the allocation.
    words.extend(text.split(DELIMITERS).filter(|word| !word.is_empty()));
    Tokens { words }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_and_trims_delimiters() {
        let line = Line::from("  cat   a.txt  b.txt ");
        let tokens = tokenize(&line);
        assert_eq!(tokens.as_slice(), &["cat", "a.txt", "b.txt"]);
        assert_eq!(tokens.command(), Some("cat"));
        assert_eq!(tokens.get(3), None);
    }

    #[test]
    fn test_every_delimiter_splits() {
        let tokens = split_words("a\tb\rc\nd\x07e f");
        assert_eq!(tokens.as_slice(), &["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_blank_lines_have_no_tokens() {
        for text in ["", " ", "\t \r\n\x07  "] {
            let tokens = split_words(text);
            assert!(tokens.is_empty(), "{text:?} should produce no tokens");
            assert_eq!(tokens.command(), None);
        }
    }

    #[test]
    fn test_quotes_are_not_special() {
        let tokens = split_words("echo \"hello world\"");
        assert_eq!(tokens.as_slice(), &["echo", "\"hello", "world\""]);
    }

    #[test]
    fn test_many_tokens_grow_past_initial_capacity() {
        let text = (0..INITIAL_TOKENS * 3)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let tokens = split_words(&text);
        assert_eq!(tokens.len(), INITIAL_TOKENS * 3);
        assert_eq!(tokens.get(0), Some("0"));
        assert_eq!(tokens.get(INITIAL_TOKENS * 3 - 1), Some("191"));
        assert_eq!(tokens.iter().last(), Some("191"));
    }
}
