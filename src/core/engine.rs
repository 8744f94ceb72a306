// File: src/core/engine.rs
use crate::config::LookupConfig;
use crate::core::term_store::TermStore;
use crate::core::types::{HitMap, RawToken};
use crate::core::window::WindowBuilder;
use crate::error::{Result, WindowFault};
use crate::matcher::{matcher_for, TermMatcher};
use crate::persistence::load_store;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

// The lookup engine ties a shared, read-only term store to one matching
// strategy. It keeps no per-window state, so a single engine serves every
// window of a document, sequentially or in parallel.
pub struct LookupEngine {
    store: Arc<TermStore>,
    matcher: Box<dyn TermMatcher>,
    window_builder: WindowBuilder,
}

impl LookupEngine {
    pub fn new(
        store: Arc<TermStore>,
        matcher: Box<dyn TermMatcher>,
        window_builder: WindowBuilder,
    ) -> Self {
        Self {
            store,
            matcher,
            window_builder,
        }
    }

    pub fn from_config(store: Arc<TermStore>, config: &LookupConfig) -> Self {
        Self::new(
            store,
            matcher_for(config),
            WindowBuilder::new(&config.excluded_pos),
        )
    }

    /// Loads a saved term store and wraps it in an engine.
    pub fn from_store_file(path: &Path, config: &LookupConfig) -> Result<Self> {
        let store = load_store(path)?;
        Ok(Self::from_config(Arc::new(store), config))
    }

    pub fn store(&self) -> &TermStore {
        &self.store
    }

    /// Finds every term in one window and adds it to `hits`.
    pub fn process_window(&self, raw_tokens: &[RawToken], hits: &mut HitMap) {
        let window = self.window_builder.build(raw_tokens);
        if window.anchor_indices.is_empty() {
            return;
        }
        self.matcher
            .find_terms(&self.store, &window.tokens, &window.anchor_indices, hits);
    }

    /// Processes windows in order. A window the host could not deliver is
    /// logged and skipped; the others are still processed.
    pub fn process_windows<I>(&self, windows: I) -> HitMap
    where
        I: IntoIterator<Item = std::result::Result<Vec<RawToken>, WindowFault>>,
    {
        let mut hits = HitMap::new();
        let mut abandoned = 0;
        for window in windows {
            match window {
                Ok(raw_tokens) => self.process_window(&raw_tokens, &mut hits),
                Err(fault) => {
                    warn!("Abandoning window: {}", fault);
                    abandoned += 1;
                }
            }
        }
        debug!("Found {} spans, abandoned {} windows", hits.len(), abandoned);
        hits
    }

    /// Processes independent windows on the rayon pool, one accumulator per
    /// window, and merges the results.
    pub fn process_windows_parallel(&self, windows: &[Vec<RawToken>]) -> HitMap {
        windows
            .par_iter()
            .map(|raw_tokens| {
                let mut hits = HitMap::new();
                self.process_window(raw_tokens, &mut hits);
                hits
            })
            .reduce(HitMap::new, |mut merged, hits| {
                merged.merge(hits);
                merged
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchStrategy;
    use crate::core::types::{DictionaryTerm, HitSpan, TextSpan, TokenClass};

    fn store() -> Arc<TermStore> {
        Arc::new(
            vec![
                DictionaryTerm::new("blood culture", 0, 1).unwrap(),
                DictionaryTerm::new("urine culture", 0, 2).unwrap(),
                DictionaryTerm::new("pain", 0, 3).unwrap(),
            ]
            .into_iter()
            .collect(),
        )
    }

    // blood=0..5 ,=5..6 urine=7..12 cultures=13..21
    fn culture_window() -> Vec<RawToken> {
        vec![
            RawToken::word("blood", 0),
            RawToken::with_class(",", 5, TokenClass::Punctuation),
            RawToken::word("urine", 7),
            RawToken::word("cultures", 13).canonical("culture"),
        ]
    }

    #[test]
    fn strategy_comes_from_config() {
        let urine = HitSpan::Contiguous(TextSpan::new(7, 21));
        let mut config = LookupConfig::default();
        let exact = LookupEngine::from_config(store(), &config);
        let mut hits = HitMap::new();
        exact.process_window(&culture_window(), &mut hits);
        assert_eq!(hits.len(), 1);
        assert!(hits.contains(&urine, 2));

        config.strategy = MatchStrategy::Overlap;
        let overlap = LookupEngine::from_config(store(), &config);
        let mut hits = HitMap::new();
        overlap.process_window(&culture_window(), &mut hits);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&urine, 2));
        assert!(hits.contains(
            &HitSpan::Gapped {
                span: TextSpan::new(0, 21),
                gaps: vec![TextSpan::new(5, 6), TextSpan::new(7, 12)],
            },
            1
        ));
    }

    #[test]
    fn excluded_pos_never_anchors() {
        let engine = LookupEngine::from_config(store(), &LookupConfig::default());
        let mut hits = HitMap::new();
        engine.process_window(&[RawToken::word("pain", 0).part_of_speech("vb")], &mut hits);
        assert!(hits.is_empty());
        engine.process_window(&[RawToken::word("pain", 0).part_of_speech("NN")], &mut hits);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn faulty_window_is_skipped() {
        let engine = LookupEngine::from_config(store(), &LookupConfig::default());
        let windows = vec![
            Ok(vec![RawToken::word("pain", 0)]),
            Err(WindowFault {
                window: 1,
                message: "index unavailable".to_string(),
            }),
            Ok(vec![RawToken::word("pain", 20)]),
        ];
        let hits = engine.process_windows(windows);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&HitSpan::Contiguous(TextSpan::new(20, 24)), 3));
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut config = LookupConfig::default();
        config.strategy = MatchStrategy::Overlap;
        let engine = LookupEngine::from_config(store(), &config);
        let windows: Vec<Vec<RawToken>> = (0..16)
            .map(|i| {
                if i % 2 == 0 {
                    culture_window()
                } else {
                    vec![RawToken::word("pain", 100 * i)]
                }
            })
            .collect();

        let sequential = engine.process_windows(windows.iter().cloned().map(Ok));
        let parallel = engine.process_windows_parallel(&windows);
        assert_eq!(sequential, parallel);
        assert!(!parallel.is_empty());
    }
}
