// File: src/core/window.rs
use crate::core::normalizer::normalize;
use crate::core::types::{NormalizedToken, RawToken, TokenClass};
use std::collections::HashSet;

/// Part-of-speech tags that never anchor a lookup.
pub const DEFAULT_EXCLUDED_POS: &[&str] = &[
    "VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "CC", "CD", "DT", "EX", "LS", "MD", "PDT", "POS",
    "PP", "PP$", "PRP", "PRP$", "RP", "TO", "WDT", "WP", "WPS", "WRB",
];

/// All tokens of one lookup window plus the positions allowed to anchor a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    pub tokens: Vec<NormalizedToken>,
    pub anchor_indices: Vec<usize>,
}

/// Turns host tokens into a [`Window`].
#[derive(Debug, Clone)]
pub struct WindowBuilder {
    excluded_pos: HashSet<String>,
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_POS.iter().copied())
    }
}

impl WindowBuilder {
    /// Tags are compared case-insensitively.
    pub fn new<I, S>(excluded_pos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_pos = excluded_pos
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_uppercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        Self { excluded_pos }
    }

    pub fn excluded_pos(&self) -> &HashSet<String> {
        &self.excluded_pos
    }

    /// Line breaks are removed before any index is assigned; punctuation,
    /// numbers, contractions and symbols stay in the window but never anchor.
    pub fn build(&self, raw_tokens: &[RawToken]) -> Window {
        let mut window = Window {
            tokens: Vec::with_capacity(raw_tokens.len()),
            anchor_indices: Vec::new(),
        };
        for raw in raw_tokens {
            if raw.class == TokenClass::Newline {
                continue;
            }
            if raw.class == TokenClass::Word && !self.is_excluded(raw.part_of_speech.as_deref()) {
                window.anchor_indices.push(window.tokens.len());
            }
            window.tokens.push(normalize(raw));
        }
        window
    }

    fn is_excluded(&self, part_of_speech: Option<&str>) -> bool {
        match part_of_speech {
            Some(tag) => self.excluded_pos.contains(&tag.to_uppercase()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_are_dropped_before_indexing() {
        let raw = vec![
            RawToken::word("Blood", 0),
            RawToken::with_class("\n", 5, TokenClass::Newline),
            RawToken::word("culture", 6),
        ];
        let window = WindowBuilder::default().build(&raw);
        assert_eq!(window.tokens.len(), 2);
        assert_eq!(window.anchor_indices, vec![0, 1]);
    }

    #[test]
    fn non_words_and_excluded_tags_never_anchor() {
        let raw = vec![
            RawToken::word("the", 0).part_of_speech("DT"),
            RawToken::word("blood", 4).part_of_speech("NN"),
            RawToken::with_class(",", 9, TokenClass::Punctuation),
            RawToken::with_class("12", 11, TokenClass::Number),
            RawToken::with_class("n't", 14, TokenClass::Contraction),
            RawToken::with_class("%", 17, TokenClass::Symbol),
            RawToken::word("was", 19).part_of_speech("vbd"),
            RawToken::word("culture", 23),
        ];
        let window = WindowBuilder::default().build(&raw);
        assert_eq!(window.tokens.len(), 8);
        assert_eq!(window.anchor_indices, vec![1, 7]);
    }

    #[test]
    fn custom_exclusions_are_case_insensitive() {
        let builder = WindowBuilder::new(["nn", " jj "]);
        let raw = vec![
            RawToken::word("acute", 0).part_of_speech("JJ"),
            RawToken::word("pain", 6).part_of_speech("NN"),
            RawToken::word("felt", 11).part_of_speech("VBD"),
        ];
        assert_eq!(builder.build(&raw).anchor_indices, vec![2]);
    }
}
