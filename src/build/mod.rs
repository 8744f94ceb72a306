// File: src/build/mod.rs
//! Offline dictionary construction, from corpus rows to a [`TermStore`].
//!
//! [`TermStore`]: crate::core::term_store::TermStore

pub mod ambiguity;
pub mod builder;
pub mod concept;
pub mod corpus;
pub mod frequency;
pub mod indexer;
pub mod term_tokenizer;

pub use ambiguity::{resolve_ambiguity, resolve_concepts, AmbiguityRule};
pub use builder::{BuildReport, DictionaryBuilder};
pub use concept::{Concept, ConceptMap};
pub use indexer::{build_term_store, select_anchor, ExclusionRules, IndexStats};
