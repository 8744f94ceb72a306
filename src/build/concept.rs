// File: src/build/concept.rs
use crate::core::types::CuiCode;
use std::collections::{BTreeMap, BTreeSet};

/// A concept as seen during dictionary construction.
///
/// Every synonym carries the number of corpus rows that produced it; the
/// ambiguity resolver weighs competing concepts by that count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    code: CuiCode,
    synonyms: BTreeMap<String, u32>,
    semantic_types: BTreeSet<String>,
    vocabularies: BTreeSet<String>,
}

impl Concept {
    pub fn new(code: CuiCode) -> Self {
        Self {
            code,
            synonyms: BTreeMap::new(),
            semantic_types: BTreeSet::new(),
            vocabularies: BTreeSet::new(),
        }
    }

    pub fn code(&self) -> CuiCode {
        self.code
    }

    /// Records one more occurrence of `text`.
    pub fn add_text(&mut self, text: &str) {
        *self.synonyms.entry(text.to_string()).or_insert(0) += 1;
    }

    pub fn add_semantic_type(&mut self, tui: &str) {
        self.semantic_types.insert(tui.to_string());
    }

    pub fn add_vocabulary(&mut self, source: &str) {
        self.vocabularies.insert(source.to_string());
    }

    /// Occurrences of `text`, zero when the concept does not have it.
    pub fn count(&self, text: &str) -> u32 {
        self.synonyms.get(text).copied().unwrap_or(0)
    }

    pub fn remove_text(&mut self, text: &str) -> bool {
        self.synonyms.remove(text).is_some()
    }

    pub fn synonym_texts(&self) -> impl Iterator<Item = &str> {
        self.synonyms.keys().map(String::as_str)
    }

    pub fn synonym_count(&self) -> usize {
        self.synonyms.len()
    }

    pub fn semantic_types(&self) -> &BTreeSet<String> {
        &self.semantic_types
    }

    pub fn vocabularies(&self) -> &BTreeSet<String> {
        &self.vocabularies
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

/// All concepts of a build, keyed by code.
pub type ConceptMap = BTreeMap<CuiCode, Concept>;
