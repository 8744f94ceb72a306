// File: src/build/builder.rs
use crate::build::ambiguity::{resolve_concepts, AmbiguityRule, ResolutionStats};
use crate::build::concept::ConceptMap;
use crate::build::corpus::{CorpusReader, CorpusStats};
use crate::build::indexer::{build_term_store, ExclusionRules, IndexStats};
use crate::config::BuildConfig;
use crate::core::term_store::TermStore;
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Everything a build did, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub corpus: CorpusStats,
    pub resolution: ResolutionStats,
    pub index: IndexStats,
}

/// Turns a concept corpus into a term store: read, resolve ambiguity, index.
pub struct DictionaryBuilder {
    config: BuildConfig,
}

impl DictionaryBuilder {
    pub fn new(config: BuildConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Resolves ambiguity in place, then indexes what is left.
    pub fn build(&self, mut concepts: ConceptMap) -> (TermStore, BuildReport) {
        let rule = AmbiguityRule::from_config(&self.config);
        let resolution = resolve_concepts(&mut concepts, &rule);
        let rules = ExclusionRules {
            max_anchor_length: self.config.max_anchor_length,
        };
        let (store, index) = build_term_store(&concepts, &rules);
        let report = BuildReport {
            corpus: CorpusStats::default(),
            resolution,
            index,
        };
        (store, report)
    }

    pub fn build_from_path(&self, corpus: &Path) -> Result<(TermStore, BuildReport)> {
        let (concepts, corpus_stats) = CorpusReader::new(&self.config).read_path(corpus)?;
        let (store, mut report) = self.build(concepts);
        report.corpus = corpus_stats;
        info!(
            "Built {} terms from {} corpus rows",
            store.len(),
            report.corpus.rows_read
        );
        Ok((store, report))
    }
}
