// File: src/core/normalizer.rs
use crate::core::types::{NormalizedToken, RawToken};

/// Converts a host token into its lookup form.
///
/// The variant is only kept when it differs from the lowercased text, so the
/// matchers never compare the same string twice.
pub fn normalize(token: &RawToken) -> NormalizedToken {
    let text = token.text.to_lowercase();
    let variant = token
        .canonical
        .as_deref()
        .map(str::to_lowercase)
        .filter(|canonical| *canonical != text);
    NormalizedToken {
        text,
        variant,
        span: token.span,
    }
}
