// src/lib.rs

pub mod build;
pub mod config;
pub mod core;
pub mod error;
pub mod matcher;
pub mod persistence;

pub use crate::build::DictionaryBuilder;
pub use crate::config::{DictionaryConfig, LookupConfig, MatchStrategy};
pub use crate::core::engine::LookupEngine;
pub use crate::core::term_store::TermStore;
pub use crate::core::types::{HitMap, HitSpan, RawToken, TextSpan, TokenClass};
pub use crate::error::{LookupError, Result, WindowFault};
pub use crate::matcher::TermMatcher;
