// File: src/build/indexer.rs
//! Corpus indexing: every synonym is filed under its rarest token.
//!
//! Token counts are taken over all synonyms of all concepts first, then each
//! synonym picks the eligible token with the lowest count as its anchor
//! (leftmost on ties). A synonym without an eligible token cannot be looked
//! up and is dropped. Building is O(total tokens).

use crate::build::concept::ConceptMap;
use crate::build::frequency::{is_rarable, TokenFrequencyTable};
use crate::core::term_store::TermStore;
use crate::core::types::DictionaryTerm;
use tracing::{debug, info, instrument, warn};

/// Default upper bound (exclusive) on the length of an anchor token.
pub const DEFAULT_MAX_ANCHOR_LENGTH: usize = 48;

/// Which tokens may anchor a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    /// Tokens with this many characters or more never anchor a term
    pub max_anchor_length: usize,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            max_anchor_length: DEFAULT_MAX_ANCHOR_LENGTH,
        }
    }
}

impl ExclusionRules {
    fn is_eligible(&self, token: &str) -> bool {
        token.chars().count() < self.max_anchor_length && is_rarable(token)
    }
}

/// Outcome counters of one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub terms_indexed: usize,
    pub synonyms_dropped: usize,
    pub distinct_anchors: usize,
}

/// Index of the rarest eligible token, or `None` when no token qualifies.
pub fn select_anchor<S: AsRef<str>>(
    tokens: &[S],
    table: &TokenFrequencyTable,
    rules: &ExclusionRules,
) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (index, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        if !rules.is_eligible(token) {
            continue;
        }
        // tokens missing from the table cannot anchor
        let Some(count) = table.count(token) else {
            continue;
        };
        // strict comparison keeps the leftmost of equally rare tokens
        if best.map_or(true, |(_, lowest)| count < lowest) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| index)
}

/// Builds the term store for a set of concepts.
#[instrument(skip_all, fields(concepts = concepts.len()))]
pub fn build_term_store(concepts: &ConceptMap, rules: &ExclusionRules) -> (TermStore, IndexStats) {
    let table = TokenFrequencyTable::from_synonyms(
        concepts.values().flat_map(|concept| concept.synonym_texts()),
    );
    debug!("Counted {} distinct rarable tokens", table.len());

    let mut store = TermStore::new();
    let mut stats = IndexStats::default();
    for concept in concepts.values() {
        for text in concept.synonym_texts() {
            let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            let Some(anchor) = select_anchor(&tokens, &table, rules) else {
                debug!("No rare word in '{}' for {}", text, concept.code());
                stats.synonyms_dropped += 1;
                continue;
            };
            match DictionaryTerm::from_tokens(text, tokens, anchor, concept.code()) {
                Ok(term) => {
                    if store.insert(term) {
                        stats.terms_indexed += 1;
                    }
                }
                Err(e) => {
                    warn!("Skipping synonym: {}", e);
                    stats.synonyms_dropped += 1;
                }
            }
        }
    }
    stats.distinct_anchors = store.anchor_count();

    info!(
        "Indexed {} terms under {} anchors, dropped {} synonyms",
        stats.terms_indexed, stats.distinct_anchors, stats.synonyms_dropped
    );
    (store, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::concept::Concept;

    fn concepts(entries: &[(i64, &[&str])]) -> ConceptMap {
        entries
            .iter()
            .map(|(code, texts)| {
                let mut concept = Concept::new(*code);
                for text in texts.iter() {
                    concept.add_text(text);
                }
                (*code, concept)
            })
            .collect()
    }

    #[test]
    fn rarest_token_wins_and_ties_go_left() {
        let table: TokenFrequencyTable =
            [("the", 100), ("culture", 5), ("blood", 5)].into_iter().collect();
        let rules = ExclusionRules::default();
        assert_eq!(select_anchor(&["the", "blood", "culture"], &table, &rules), Some(1));

        let table: TokenFrequencyTable = [("blood", 5), ("culture", 2)].into_iter().collect();
        assert_eq!(select_anchor(&["blood", "culture"], &table, &rules), Some(1));
    }

    #[test]
    fn ineligible_tokens_never_anchor() {
        let table: TokenFrequencyTable = [("the", 1), ("of", 1), ("12", 1)].into_iter().collect();
        let rules = ExclusionRules::default();
        assert_eq!(select_anchor(&["the", "of", "12"], &table, &rules), None);
        assert_eq!(select_anchor(&["unknown"], &table, &rules), None);

        let long = "a".repeat(48);
        let table: TokenFrequencyTable = [(long.as_str(), 1)].into_iter().collect();
        assert_eq!(select_anchor(&[long.as_str()], &table, &rules), None);
    }

    #[test]
    fn indexes_every_synonym_under_its_anchor() {
        let concepts = concepts(&[
            (1, &["blood culture", "hemoculture"]),
            (2, &["urine culture"]),
            (3, &["of the"]),
        ]);
        let (store, stats) = build_term_store(&concepts, &ExclusionRules::default());

        assert_eq!(stats.terms_indexed, 3);
        assert_eq!(stats.synonyms_dropped, 1);
        assert_eq!(stats.distinct_anchors, 3);
        assert_eq!(store.len(), 3);

        // culture appears twice, blood and urine once each
        assert_eq!(store.lookup("blood")[0].concept_code(), 1);
        assert_eq!(store.lookup("urine")[0].concept_code(), 2);
        assert_eq!(store.lookup("hemoculture")[0].anchor_index(), 0);
        assert!(store.lookup("culture").is_empty());
    }

    #[test]
    fn shared_synonyms_produce_one_term_per_concept() {
        let concepts = concepts(&[(1, &["cold"]), (2, &["cold"])]);
        let (store, stats) = build_term_store(&concepts, &ExclusionRules::default());
        assert_eq!(stats.terms_indexed, 2);
        assert_eq!(store.lookup("cold").len(), 2);
    }
}
