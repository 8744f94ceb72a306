// File: src/matcher/exact.rs
use crate::core::term_store::TermStore;
use crate::core::types::{DictionaryTerm, HitMap, HitSpan, NormalizedToken, TextSpan};
use crate::matcher::{collect_hits, TermMatcher, DEFAULT_MINIMUM_SPAN};

/// Contiguous matching: every term token must appear, in order, with nothing
/// in between.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    min_span: usize,
}

impl Default for ExactMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_SPAN)
    }
}

impl ExactMatcher {
    pub fn new(min_span: usize) -> Self {
        Self { min_span }
    }
}

impl TermMatcher for ExactMatcher {
    fn find_terms(
        &self,
        store: &TermStore,
        tokens: &[NormalizedToken],
        anchor_indices: &[usize],
        hits: &mut HitMap,
    ) {
        collect_hits(store, tokens, anchor_indices, self.min_span, hits, |tokens, _, start, term| {
            exact_span(tokens, start, term)
        });
    }
}

/// O(k) in the term's token count.
fn exact_span(tokens: &[NormalizedToken], start: usize, term: &DictionaryTerm) -> Option<HitSpan> {
    let covered = tokens.get(start..start + term.token_count())?;
    let all_match = covered
        .iter()
        .zip(term.tokens())
        .all(|(token, word)| token.matches(word));
    if !all_match {
        return None;
    }
    let first = covered.first()?;
    let last = covered.last()?;
    Some(HitSpan::Contiguous(TextSpan::new(first.span.start, last.span.end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::test_support::*;

    fn find(store: &TermStore, text: &str) -> HitMap {
        let tokens = window(text);
        let mut hits = HitMap::new();
        ExactMatcher::default().find_terms(store, &tokens, &all_anchors(&tokens), &mut hits);
        hits
    }

    #[test]
    fn matches_contiguous_term_with_exact_bounds() {
        let store = store(&[("blood culture", 1, 11)]);
        let hits = find(&store, "negative blood culture today");
        assert_eq!(hits.len(), 1);
        assert!(hits.contains(&HitSpan::Contiguous(TextSpan::new(9, 22)), 11));
    }

    #[test]
    fn matches_through_variants() {
        let store = store(&[("blood culture", 1, 11)]);
        let hits = find(&store, "bloods/blood cultures/culture");
        assert!(hits.contains(&HitSpan::Contiguous(TextSpan::new(0, 15)), 11));
    }

    #[test]
    fn no_skipping_allowed() {
        let store = store(&[("blood culture", 1, 11)]);
        assert!(find(&store, "blood , culture").is_empty());
        assert!(find(&store, "culture blood").is_empty());
    }

    #[test]
    fn terms_crossing_window_edges_are_rejected() {
        let store = store(&[("chest pain radiating", 1, 5), ("left chest pain", 2, 6)]);
        assert!(find(&store, "chest pain").is_empty());
        assert_eq!(find(&store, "left chest pain radiating").len(), 2);
    }

    #[test]
    fn single_token_terms_use_the_anchor_span() {
        let store = store(&[("fever", 0, 3), ("flu", 0, 4), ("hx", 0, 5)]);
        let hits = find(&store, "hx fever flu");
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&HitSpan::Contiguous(TextSpan::new(3, 8)), 3));
        assert!(hits.contains(&HitSpan::Contiguous(TextSpan::new(9, 12)), 4));
    }

    #[test]
    fn same_span_collects_every_concept() {
        let store = store(&[("heart attack", 1, 1), ("heart attack", 1, 2)]);
        let hits = find(&store, "heart attack");
        let codes: Vec<_> = hits.all_codes().into_iter().collect();
        assert_eq!(codes, vec![1, 2]);
        assert_eq!(hits.len(), 1);
    }
}
