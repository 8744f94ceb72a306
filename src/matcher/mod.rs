// File: src/matcher/mod.rs
//! Term matching strategies.
//!
//! Both strategies share the same candidate walk: every anchor token is
//! looked up in the [`TermStore`] by text and by variant, terms shorter than
//! the minimum span are skipped, single-token terms are accepted on the spot
//! and multi-token terms that would not fit inside the window are rejected.
//! The strategies only differ in how the remaining candidates are verified.

pub mod exact;
pub mod overlap;

pub use exact::ExactMatcher;
pub use overlap::{CommaPolicy, OverlapMatcher};

use crate::config::{LookupConfig, MatchStrategy};
use crate::core::term_store::TermStore;
use crate::core::types::{DictionaryTerm, HitMap, HitSpan, NormalizedToken};

/// Minimum number of characters in a term's text before it can be reported.
pub const DEFAULT_MINIMUM_SPAN: usize = 3;

/// A term-finding strategy. Implementations are stateless between calls, so
/// one matcher can serve many windows at once as long as each call gets its
/// own `hits` accumulator.
pub trait TermMatcher: Send + Sync {
    fn find_terms(
        &self,
        store: &TermStore,
        tokens: &[NormalizedToken],
        anchor_indices: &[usize],
        hits: &mut HitMap,
    );
}

/// Builds the matcher selected by the configuration.
pub fn matcher_for(config: &LookupConfig) -> Box<dyn TermMatcher> {
    match config.strategy {
        MatchStrategy::Exact => Box::new(ExactMatcher::new(config.min_span)),
        MatchStrategy::Overlap => Box::new(
            OverlapMatcher::new(config.min_span)
                .with_skips(config.consecutive_skip_max, config.total_skip_max)
                .with_comma_policy(if config.legacy_comma_asymmetry {
                    CommaPolicy::LeadingOnly
                } else {
                    CommaPolicy::BothSides
                }),
        ),
    }
}

/// Candidate walk shared by all strategies.
///
/// `verify` receives the window, the anchor position, the computed term start
/// and the candidate; it is only called for multi-token terms that fit.
pub(crate) fn collect_hits<F>(
    store: &TermStore,
    tokens: &[NormalizedToken],
    anchor_indices: &[usize],
    min_span: usize,
    hits: &mut HitMap,
    mut verify: F,
) where
    F: FnMut(&[NormalizedToken], usize, usize, &DictionaryTerm) -> Option<HitSpan>,
{
    for &anchor in anchor_indices {
        let Some(token) = tokens.get(anchor) else {
            continue;
        };
        let by_variant: &[DictionaryTerm] = match token.variant.as_deref() {
            Some(variant) => store.lookup(variant),
            None => &[],
        };
        for term in store.lookup(&token.text).iter().chain(by_variant) {
            if term.text_len() < min_span {
                continue;
            }
            if term.token_count() == 1 {
                hits.place(HitSpan::Contiguous(token.span), term.concept_code());
                continue;
            }
            let Some(start) = anchor.checked_sub(term.anchor_index()) else {
                continue;
            };
            if start + term.token_count() > tokens.len() {
                // term would extend beyond the window
                continue;
            }
            if let Some(span) = verify(tokens, anchor, start, term) {
                hits.place(span, term.concept_code());
            }
        }
    }
}
