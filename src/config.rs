// File: src/config.rs
//
// Lookup and dictionary-build settings, read from a TOML file. Every field
// has a default, so an empty file is a valid configuration.

use crate::core::window::DEFAULT_EXCLUDED_POS;
use crate::error::{LookupError, Result};
use crate::matcher::overlap::{DEFAULT_CONSECUTIVE_SKIP_MAX, DEFAULT_TOTAL_SKIP_MAX};
use crate::matcher::DEFAULT_MINIMUM_SPAN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// UMLS semantic types of the anatomy group.
pub const ANATOMY_SEMANTIC_TYPES: &[&str] = &[
    "T017", "T018", "T021", "T022", "T023", "T024", "T025", "T026", "T029", "T030", "T031",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Contiguous tokens only
    #[default]
    Exact,
    /// Tolerates skipped tokens between term words
    Overlap,
}

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DictionaryConfig {
    pub lookup: LookupConfig,
    pub build: BuildConfig,
}

/// Run-time matching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    pub strategy: MatchStrategy,

    /// Terms with fewer characters than this are never reported
    pub min_span: usize,

    /// Part-of-speech tags that cannot anchor a lookup
    pub excluded_pos: Vec<String>,

    /// Overlap only: unmatched non-comma tokens that may be skipped in a row
    pub consecutive_skip_max: usize,

    /// Overlap only: unmatched tokens that may be skipped per term
    pub total_skip_max: usize,

    /// Overlap only: exempt commas from the consecutive budget on the
    /// leading side of the anchor only
    pub legacy_comma_asymmetry: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Exact,
            min_span: DEFAULT_MINIMUM_SPAN,
            excluded_pos: DEFAULT_EXCLUDED_POS.iter().map(|tag| tag.to_string()).collect(),
            consecutive_skip_max: DEFAULT_CONSECUTIVE_SKIP_MAX,
            total_skip_max: DEFAULT_TOTAL_SKIP_MAX,
            legacy_comma_asymmetry: false,
        }
    }
}

/// Dictionary construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Synonyms shorter than this are discarded
    pub min_char_length: usize,

    /// Synonyms with a token longer than this are discarded
    pub max_char_length: usize,

    /// Maximum tokens longer than two characters per synonym
    pub max_word_count: usize,

    /// Maximum tokens of one or two characters per synonym
    pub max_sym_count: usize,

    /// Tokens at least this long never anchor a term
    pub max_anchor_length: usize,

    /// Source vocabularies to read; empty reads all
    pub wanted_sources: Vec<String>,

    /// Ambiguity resolution divisor
    pub wsd_divisor: u32,

    /// Count multiplier for concepts in the boosted semantic category
    pub boost_multiplier: u32,

    /// Semantic types of the boosted category
    pub boosted_semantic_types: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            min_char_length: 2,
            max_char_length: 48,
            max_word_count: 12,
            max_sym_count: 7,
            max_anchor_length: 48,
            wanted_sources: Vec::new(),
            wsd_divisor: 2,
            boost_multiplier: 2,
            boosted_semantic_types: ANATOMY_SEMANTIC_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl DictionaryConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DictionaryConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.build.validate()
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        if self.wsd_divisor == 0 {
            return Err(LookupError::Config("wsd_divisor must be at least 1".to_string()));
        }
        if self.boost_multiplier == 0 {
            return Err(LookupError::Config(
                "boost_multiplier must be at least 1".to_string(),
            ));
        }
        if self.min_char_length > self.max_char_length {
            return Err(LookupError::Config(format!(
                "min_char_length ({}) exceeds max_char_length ({})",
                self.min_char_length, self.max_char_length
            )));
        }
        if self.max_anchor_length == 0 {
            return Err(LookupError::Config(
                "max_anchor_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
