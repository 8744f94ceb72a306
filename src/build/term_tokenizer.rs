// File: src/build/term_tokenizer.rs
//! Splits dictionary synonyms into the same token boundaries the host
//! tokenizer produces for running text, so that synonym tokens and window
//! tokens can be compared one to one.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static PREFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "e", "a", "u", "x", "agro", "ante", "anti", "arch", "be", "bi", "bio", "co", "counter",
        "cross", "cyber", "de", "eco", "ex", "extra", "inter", "intra", "macro", "mega", "micro",
        "mid", "mini", "multi", "neo", "non", "over", "pan", "para", "peri", "post", "pre", "pro",
        "pseudo", "quasi", "re", "semi", "sub", "super", "tri", "ultra", "un", "uni", "vice",
        "electro", "gasto", "homo", "hetero", "ortho", "phospho",
    ]
    .into_iter()
    .collect()
});

static SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "esque", "ette", "fest", "fold", "gate", "itis", "less", "most", "rama", "wise",
    ]
    .into_iter()
    .collect()
});

/// Tokenizes a synonym and joins the tokens with single spaces.
///
/// `"non-small cell (lung)"` becomes `"non-small cell ( lung )"`.
pub fn tokenize_term(text: &str) -> String {
    text.split_whitespace()
        .flat_map(split_piece)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokens of one whitespace-free piece of text.
fn split_piece(piece: &str) -> Vec<String> {
    let chars: Vec<char> = piece.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
            continue;
        }
        if c == '-' && (PREFIXES.contains(current.as_str()) || is_suffix(&chars[i + 1..])) {
            current.push(c);
            continue;
        }
        let is_final_pair = i + 2 == chars.len();
        if is_final_pair
            && ((c == '\'' && chars[i + 1] == 's') || (c == '.' && chars[i + 1].is_ascii_digit()))
        {
            // possessive 's and a trailing decimal start a token of their own
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        tokens.push(c.to_string());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_suffix(rest: &[char]) -> bool {
    let word: String = rest.iter().take_while(|c| c.is_alphanumeric()).collect();
    !word.is_empty() && SUFFIXES.contains(word.as_str())
}
