// File: src/core/cui.rs
use crate::core::types::CuiCode;
use crate::error::{LookupError, Result};

/// Parses `C0004096` (or bare `4096`) into its numeric code.
pub fn parse_cui(cui: &str) -> Result<CuiCode> {
    let trimmed = cui.trim();
    let digits = trimmed
        .strip_prefix('C')
        .or_else(|| trimmed.strip_prefix('c'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LookupError::InvalidCui(cui.to_string()));
    }
    digits
        .parse::<CuiCode>()
        .map_err(|_| LookupError::InvalidCui(cui.to_string()))
}

/// Formats a code as a CUI, zero-padded to seven digits.
pub fn format_cui(code: CuiCode) -> String {
    format!("C{:07}", code)
}
