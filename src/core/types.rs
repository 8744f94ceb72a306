// src/core/types.rs
use crate::error::{LookupError, Result};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Numeric concept identifier (a CUI with its leading `C` stripped).
pub type CuiCode = i64;

/// Character offsets of a piece of document text. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Token class flag supplied by the host tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    Word,
    Punctuation,
    Number,
    Contraction,
    Symbol,
    Newline,
}

/// One token as the host pipeline hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    pub text: String,
    pub span: TextSpan,
    /// Canonical (lemma) form, when the host computed one.
    pub canonical: Option<String>,
    pub part_of_speech: Option<String>,
    pub class: TokenClass,
}

impl RawToken {
    pub fn word(text: &str, start: usize) -> Self {
        Self::with_class(text, start, TokenClass::Word)
    }

    pub fn with_class(text: &str, start: usize, class: TokenClass) -> Self {
        Self {
            text: text.to_string(),
            span: TextSpan::new(start, start + text.chars().count()),
            canonical: None,
            part_of_speech: None,
            class,
        }
    }

    pub fn canonical(mut self, canonical: &str) -> Self {
        self.canonical = Some(canonical.to_string());
        self
    }

    pub fn part_of_speech(mut self, tag: &str) -> Self {
        self.part_of_speech = Some(tag.to_string());
        self
    }
}

/// The lookup form of a window token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedToken {
    pub text: String,
    /// Lowercased canonical form; only present when it differs from `text`.
    pub variant: Option<String>,
    pub span: TextSpan,
}

impl NormalizedToken {
    /// True when either the text or the variant equals `word`.
    #[inline]
    pub fn matches(&self, word: &str) -> bool {
        self.text == word || self.variant.as_deref() == Some(word)
    }

    #[inline]
    pub fn is_comma(&self) -> bool {
        self.text == ","
    }
}

/// A dictionary synonym split into tokens, indexed by its anchor token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DictionaryTerm {
    full_text: String,
    tokens: Vec<String>,
    anchor_index: usize,
    concept_code: CuiCode,
}

impl DictionaryTerm {
    /// Builds a term from its space-tokenized text.
    pub fn new(full_text: &str, anchor_index: usize, concept_code: CuiCode) -> Result<Self> {
        let tokens: Vec<String> = full_text.split_whitespace().map(str::to_string).collect();
        Self::from_tokens(full_text, tokens, anchor_index, concept_code)
    }

    pub fn from_tokens(
        full_text: &str,
        tokens: Vec<String>,
        anchor_index: usize,
        concept_code: CuiCode,
    ) -> Result<Self> {
        let term = Self {
            full_text: full_text.to_string(),
            tokens,
            anchor_index,
            concept_code,
        };
        term.check()?;
        Ok(term)
    }

    /// Re-checks the token/anchor invariant, for terms that did not come
    /// through [`DictionaryTerm::from_tokens`] (a deserialized store).
    pub fn check(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(LookupError::InvalidTerm {
                text: self.full_text.clone(),
                reason: "term has no tokens".to_string(),
            });
        }
        if self.anchor_index >= self.tokens.len() {
            return Err(LookupError::InvalidTerm {
                text: self.full_text.clone(),
                reason: format!(
                    "anchor index {} is outside {} tokens",
                    self.anchor_index,
                    self.tokens.len()
                ),
            });
        }
        Ok(())
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn anchor_word(&self) -> &str {
        &self.tokens[self.anchor_index]
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn concept_code(&self) -> CuiCode {
        self.concept_code
    }

    /// Character length used by the minimum-span filter.
    pub fn text_len(&self) -> usize {
        self.full_text.chars().count()
    }
}

/// Where a term was found. A gapped hit also lists the skipped tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitSpan {
    Contiguous(TextSpan),
    Gapped { span: TextSpan, gaps: Vec<TextSpan> },
}

impl HitSpan {
    pub fn span(&self) -> TextSpan {
        match self {
            HitSpan::Contiguous(span) => *span,
            HitSpan::Gapped { span, .. } => *span,
        }
    }

    pub fn gaps(&self) -> &[TextSpan] {
        match self {
            HitSpan::Contiguous(_) => &[],
            HitSpan::Gapped { gaps, .. } => gaps,
        }
    }

    pub fn is_gapped(&self) -> bool {
        matches!(self, HitSpan::Gapped { .. })
    }
}

/// Multimap of hit span to concept codes, ordered by span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitMap {
    hits: BTreeMap<HitSpan, BTreeSet<CuiCode>>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, span: HitSpan, code: CuiCode) {
        self.hits.entry(span).or_default().insert(code);
    }

    /// Moves every hit of `other` into this map.
    pub fn merge(&mut self, other: HitMap) {
        for (span, codes) in other.hits {
            self.hits.entry(span).or_default().extend(codes);
        }
    }

    pub fn codes(&self, span: &HitSpan) -> Option<&BTreeSet<CuiCode>> {
        self.hits.get(span)
    }

    pub fn contains(&self, span: &HitSpan, code: CuiCode) -> bool {
        self.hits.get(span).is_some_and(|codes| codes.contains(&code))
    }

    pub fn all_codes(&self) -> BTreeSet<CuiCode> {
        self.hits.values().flatten().copied().collect()
    }

    /// Number of distinct spans.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, HitSpan, BTreeSet<CuiCode>> {
        self.hits.iter()
    }
}

impl<'a> IntoIterator for &'a HitMap {
    type Item = (&'a HitSpan, &'a BTreeSet<CuiCode>);
    type IntoIter = btree_map::Iter<'a, HitSpan, BTreeSet<CuiCode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
