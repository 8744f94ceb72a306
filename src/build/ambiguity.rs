// File: src/build/ambiguity.rs
//! Frequency-based ambiguity resolution.
//!
//! When several concepts share a synonym, the concepts whose weighted count
//! for it is at most `max / divisor` lose the synonym. Concepts of the
//! boosted semantic category have their counts multiplied first, so an
//! anatomy sense tends to win over a finding with the same name.

use crate::build::concept::{Concept, ConceptMap};
use crate::config::BuildConfig;
use crate::core::term_store::TermStore;
use crate::core::types::CuiCode;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityRule {
    pub boosted_types: BTreeSet<String>,
    pub multiplier: u32,
    pub divisor: u32,
}

impl AmbiguityRule {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            boosted_types: config.boosted_semantic_types.iter().cloned().collect(),
            multiplier: config.boost_multiplier,
            divisor: config.wsd_divisor,
        }
    }

    /// A concept is boosted when it has semantic types and every one of them
    /// is in the boosted set. A concept without semantic types is never
    /// boosted, unlike a plain subset test which would boost it.
    pub fn is_boosted(&self, concept: &Concept) -> bool {
        !concept.semantic_types().is_empty()
            && concept
                .semantic_types()
                .iter()
                .all(|tui| self.boosted_types.contains(tui))
    }

    fn weighted_count(&self, concept: &Concept, text: &str) -> u64 {
        let count = u64::from(concept.count(text));
        if self.is_boosted(concept) {
            count * u64::from(self.multiplier)
        } else {
            count
        }
    }
}

impl Default for AmbiguityRule {
    fn default() -> Self {
        Self::from_config(&BuildConfig::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub ambiguous_texts: usize,
    pub synonyms_removed: usize,
    pub concepts_removed: usize,
}

/// Every (concept, synonym) pair that loses its synonym.
fn losing_synonyms(concepts: &ConceptMap, rule: &AmbiguityRule) -> (Vec<(CuiCode, String)>, usize) {
    let mut owners: BTreeMap<&str, Vec<&Concept>> = BTreeMap::new();
    for concept in concepts.values() {
        for text in concept.synonym_texts() {
            owners.entry(text).or_default().push(concept);
        }
    }

    let divisor = u64::from(rule.divisor.max(1));
    let mut losers = Vec::new();
    let mut ambiguous = 0;
    for (text, competitors) in owners.iter().filter(|(_, owners)| owners.len() > 1) {
        ambiguous += 1;
        let weighted: Vec<(CuiCode, u64)> = competitors
            .iter()
            .map(|concept| (concept.code(), rule.weighted_count(concept, text)))
            .collect();
        let max = weighted.iter().map(|(_, count)| *count).max().unwrap_or(0);
        if max <= 1 {
            continue;
        }
        let threshold = max / divisor;
        for (code, count) in weighted {
            if count <= threshold {
                debug!("'{}' dropped from {} ({} <= {})", text, code, count, threshold);
                losers.push((code, text.to_string()));
            }
        }
    }
    (losers, ambiguous)
}

/// Removes losing synonyms from the concepts in place, then drops the
/// concepts left without synonyms.
#[instrument(skip_all, fields(concepts = concepts.len()))]
pub fn resolve_concepts(concepts: &mut ConceptMap, rule: &AmbiguityRule) -> ResolutionStats {
    let (losers, ambiguous_texts) = losing_synonyms(concepts, rule);
    let mut stats = ResolutionStats {
        ambiguous_texts,
        ..ResolutionStats::default()
    };
    for (code, text) in &losers {
        if let Some(concept) = concepts.get_mut(code) {
            if concept.remove_text(text) {
                stats.synonyms_removed += 1;
            }
        }
    }
    let before = concepts.len();
    concepts.retain(|_, concept| !concept.is_empty());
    stats.concepts_removed = before - concepts.len();

    info!(
        "Resolved {} ambiguous texts: removed {} synonyms and {} concepts",
        stats.ambiguous_texts, stats.synonyms_removed, stats.concepts_removed
    );
    stats
}

/// Filtered copy of an indexed store without the losing terms.
pub fn resolve_ambiguity(store: &TermStore, concepts: &ConceptMap, rule: &AmbiguityRule) -> TermStore {
    let (losers, _) = losing_synonyms(concepts, rule);
    let losers: HashSet<(CuiCode, String)> = losers.into_iter().collect();
    store.filtered(|term| !losers.contains(&(term.concept_code(), term.full_text().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::indexer::{build_term_store, ExclusionRules};

    fn concept(code: CuiCode, tui: &str, texts: &[(&str, u32)]) -> Concept {
        let mut concept = Concept::new(code);
        concept.add_semantic_type(tui);
        for (text, count) in texts {
            for _ in 0..*count {
                concept.add_text(text);
            }
        }
        concept
    }

    fn map(concepts: Vec<Concept>) -> ConceptMap {
        concepts.into_iter().map(|c| (c.code(), c)).collect()
    }

    #[test]
    fn boosted_winner_drops_weaker_sense() {
        // A: 5 * 2 = 10, B: 3; threshold 10 / 2 = 5
        let mut concepts = map(vec![
            concept(1, "T023", &[("heart", 5)]),
            concept(2, "T047", &[("heart", 3), ("cardiac disorder", 1)]),
        ]);
        let stats = resolve_concepts(&mut concepts, &AmbiguityRule::default());

        assert_eq!(stats.ambiguous_texts, 1);
        assert_eq!(stats.synonyms_removed, 1);
        assert_eq!(concepts[&1].count("heart"), 5);
        assert_eq!(concepts[&2].count("heart"), 0);
        assert_eq!(concepts[&2].count("cardiac disorder"), 1);
    }

    #[test]
    fn low_counts_keep_all_senses() {
        let mut concepts = map(vec![
            concept(1, "T047", &[("cold", 1)]),
            concept(2, "T033", &[("cold", 1)]),
        ]);
        let stats = resolve_concepts(&mut concepts, &AmbiguityRule::default());
        assert_eq!(stats.synonyms_removed, 0);
        assert_eq!(concepts.len(), 2);
    }

    #[test]
    fn close_counts_keep_both_senses() {
        // max 4, threshold 2; 3 survives
        let mut concepts = map(vec![
            concept(1, "T047", &[("cold", 4)]),
            concept(2, "T033", &[("cold", 3)]),
        ]);
        resolve_concepts(&mut concepts, &AmbiguityRule::default());
        assert_eq!(concepts[&2].count("cold"), 3);
    }

    #[test]
    fn emptied_concepts_are_removed() {
        let mut concepts = map(vec![
            concept(1, "T047", &[("cold", 6)]),
            concept(2, "T033", &[("cold", 1)]),
        ]);
        let stats = resolve_concepts(&mut concepts, &AmbiguityRule::default());
        assert_eq!(stats.concepts_removed, 1);
        assert!(!concepts.contains_key(&2));
    }

    #[test]
    fn mixed_semantic_types_are_not_boosted() {
        let rule = AmbiguityRule::default();
        let mut mixed = concept(1, "T023", &[("heart", 1)]);
        assert!(rule.is_boosted(&mixed));
        mixed.add_semantic_type("T047");
        assert!(!rule.is_boosted(&mixed));
        assert!(!rule.is_boosted(&Concept::new(2)));
    }

    #[test]
    fn resolve_ambiguity_filters_indexed_store() {
        let concepts = map(vec![
            concept(1, "T023", &[("heart", 5)]),
            concept(2, "T047", &[("heart", 3)]),
        ]);
        let (store, _) = build_term_store(&concepts, &ExclusionRules::default());
        assert_eq!(store.lookup("heart").len(), 2);

        let resolved = resolve_ambiguity(&store, &concepts, &AmbiguityRule::default());
        let codes: Vec<CuiCode> = resolved.lookup("heart").iter().map(|t| t.concept_code()).collect();
        assert_eq!(codes, vec![1]);
    }
}
