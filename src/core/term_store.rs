// File: src/core/term_store.rs
use crate::core::types::DictionaryTerm;
use crate::error::{LookupError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rare-word index: anchor word -> terms whose anchor token is that word.
///
/// Filled once while the dictionary is built, then only read. It holds no
/// interior mutability, so an `Arc<TermStore>` can be shared by any number
/// of matching threads without locking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermStore {
    terms: HashMap<String, Vec<DictionaryTerm>>,
    term_count: usize,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term under its anchor word. Duplicate terms are ignored.
    /// O(n) in the number of terms already sharing the anchor, which stays small.
    pub fn insert(&mut self, term: DictionaryTerm) -> bool {
        let bucket = self.terms.entry(term.anchor_word().to_string()).or_default();
        if bucket.contains(&term) {
            return false;
        }
        bucket.push(term);
        self.term_count += 1;
        true
    }

    /// All terms anchored on `word`; empty for unknown words. O(1) average.
    pub fn lookup(&self, word: &str) -> &[DictionaryTerm] {
        self.terms.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.term_count
    }

    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }

    /// Number of distinct anchor words.
    pub fn anchor_count(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &DictionaryTerm> {
        self.terms.values().flatten()
    }

    /// Rebuilds a store that was read from outside, checking every term and
    /// that each term sits under its own anchor word. The term count is
    /// recomputed rather than trusted.
    pub fn verified(self) -> Result<TermStore> {
        let mut store = TermStore::new();
        for (anchor, bucket) in self.terms {
            for term in bucket {
                term.check()?;
                if term.anchor_word() != anchor {
                    return Err(LookupError::InvalidTerm {
                        text: term.full_text().to_string(),
                        reason: format!(
                            "filed under '{}' but its anchor word is '{}'",
                            anchor,
                            term.anchor_word()
                        ),
                    });
                }
                store.insert(term);
            }
        }
        Ok(store)
    }

    /// Copy of the store holding only the terms accepted by `keep`.
    pub fn filtered<F>(&self, mut keep: F) -> TermStore
    where
        F: FnMut(&DictionaryTerm) -> bool,
    {
        let mut store = TermStore::new();
        for term in self.terms().filter(|term| keep(term)) {
            store.insert(term.clone());
        }
        store
    }
}

impl FromIterator<DictionaryTerm> for TermStore {
    fn from_iter<I: IntoIterator<Item = DictionaryTerm>>(iter: I) -> Self {
        let mut store = TermStore::new();
        for term in iter {
            store.insert(term);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(text: &str, anchor: usize, code: i64) -> DictionaryTerm {
        DictionaryTerm::new(text, anchor, code).unwrap()
    }

    #[test]
    fn lookup_returns_every_term_for_an_anchor() {
        let store: TermStore = vec![
            term("blood culture", 1, 1),
            term("urine culture", 1, 2),
            term("blood", 0, 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.len(), 3);
        assert_eq!(store.anchor_count(), 2);
        assert_eq!(store.lookup("culture").len(), 2);
        assert_eq!(store.lookup("blood").len(), 1);
        assert!(store.lookup("sputum").is_empty());
    }

    #[test]
    fn insert_ignores_duplicates() {
        let mut store = TermStore::new();
        assert!(store.insert(term("blood culture", 1, 1)));
        assert!(!store.insert(term("blood culture", 1, 1)));
        assert!(store.insert(term("blood culture", 1, 2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn filtered_keeps_selected_terms() {
        let store: TermStore = vec![term("cold", 0, 1), term("cold", 0, 2)].into_iter().collect();
        let kept = store.filtered(|t| t.concept_code() == 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.lookup("cold")[0].concept_code(), 2);
        assert_eq!(store.len(), 2);
    }
}
