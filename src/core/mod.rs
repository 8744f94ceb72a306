// File: src/core/mod.rs
pub mod cui;
pub mod engine;
pub mod normalizer;
pub mod term_store;
pub mod types;
pub mod window;
