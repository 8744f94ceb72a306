// File: src/matcher/overlap.rs
use crate::core::term_store::TermStore;
use crate::core::types::{DictionaryTerm, HitMap, HitSpan, NormalizedToken, TextSpan};
use crate::matcher::{collect_hits, TermMatcher, DEFAULT_MINIMUM_SPAN};

pub const DEFAULT_CONSECUTIVE_SKIP_MAX: usize = 2;
pub const DEFAULT_TOTAL_SKIP_MAX: usize = 4;

/// Which walks exempt a skipped comma from the consecutive-skip budget.
/// Skipped commas always count toward the total budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommaPolicy {
    /// Commas are exempt on both sides of the anchor.
    BothSides,
    /// Commas are exempt only while walking toward the window start.
    LeadingOnly,
}

/// Gap-tolerant matching.
///
/// Starting from the anchor, the matcher walks left and then right looking
/// for the remaining term tokens in order, skipping up to
/// `consecutive_skip_max` unmatched tokens in a row and `total_skip_max`
/// unmatched tokens overall. "blood, urine, sputum cultures" therefore
/// yields both "blood culture" and "urine culture".
#[derive(Debug, Clone)]
pub struct OverlapMatcher {
    min_span: usize,
    consecutive_skip_max: usize,
    total_skip_max: usize,
    comma_policy: CommaPolicy,
}

impl Default for OverlapMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_SPAN)
    }
}

/// Skip bookkeeping shared by both walks of one candidate.
struct SkipBudget {
    consecutive: usize,
    total: usize,
    gaps: Vec<TextSpan>,
}

impl OverlapMatcher {
    pub fn new(min_span: usize) -> Self {
        Self {
            min_span,
            consecutive_skip_max: DEFAULT_CONSECUTIVE_SKIP_MAX,
            total_skip_max: DEFAULT_TOTAL_SKIP_MAX,
            comma_policy: CommaPolicy::BothSides,
        }
    }

    pub fn with_skips(mut self, consecutive_skip_max: usize, total_skip_max: usize) -> Self {
        self.consecutive_skip_max = consecutive_skip_max;
        self.total_skip_max = total_skip_max;
        self
    }

    pub fn with_comma_policy(mut self, comma_policy: CommaPolicy) -> Self {
        self.comma_policy = comma_policy;
        self
    }

    /// Records a skipped token. Returns false once either budget is exceeded.
    fn skip(&self, budget: &mut SkipBudget, token: &NormalizedToken, comma_exempt: bool) -> bool {
        budget.gaps.push(token.span);
        if !(comma_exempt && token.is_comma()) {
            budget.consecutive += 1;
            if budget.consecutive > self.consecutive_skip_max {
                return false;
            }
        }
        budget.total += 1;
        budget.total <= self.total_skip_max
    }

    fn overlap_span(
        &self,
        tokens: &[NormalizedToken],
        anchor: usize,
        term: &DictionaryTerm,
    ) -> Option<HitSpan> {
        let wanted = term.tokens();
        let rare_index = term.anchor_index();
        let mut budget = SkipBudget {
            consecutive: 0,
            total: 0,
            gaps: Vec::new(),
        };

        let first = if rare_index == 0 {
            anchor
        } else {
            let mut next = rare_index - 1;
            let mut found = None;
            for index in (0..anchor).rev() {
                let token = &tokens[index];
                if token.matches(&wanted[next]) {
                    if next == 0 {
                        found = Some(index);
                        break;
                    }
                    next -= 1;
                    budget.consecutive = 0;
                    continue;
                }
                if !self.skip(&mut budget, token, true) {
                    break;
                }
            }
            found?
        };

        let last = if rare_index + 1 == term.token_count() {
            anchor
        } else {
            budget.consecutive = 0;
            let comma_exempt = self.comma_policy == CommaPolicy::BothSides;
            let mut next = rare_index + 1;
            let mut found = None;
            for (index, token) in tokens.iter().enumerate().skip(anchor + 1) {
                if token.matches(&wanted[next]) {
                    next += 1;
                    if next == term.token_count() {
                        found = Some(index);
                        break;
                    }
                    budget.consecutive = 0;
                    continue;
                }
                if !self.skip(&mut budget, token, comma_exempt) {
                    break;
                }
            }
            found?
        };

        let span = TextSpan::new(tokens[first].span.start, tokens[last].span.end);
        if budget.gaps.is_empty() {
            return Some(HitSpan::Contiguous(span));
        }
        budget.gaps.sort();
        Some(HitSpan::Gapped {
            span,
            gaps: budget.gaps,
        })
    }
}

impl TermMatcher for OverlapMatcher {
    fn find_terms(
        &self,
        store: &TermStore,
        tokens: &[NormalizedToken],
        anchor_indices: &[usize],
        hits: &mut HitMap,
    ) {
        collect_hits(store, tokens, anchor_indices, self.min_span, hits, |tokens, anchor, _, term| {
            self.overlap_span(tokens, anchor, term)
        });
    }
}
