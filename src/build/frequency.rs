// File: src/build/frequency.rs
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Closed-class words that are too common to anchor a term.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // verbs
        "be", "has", "have", "had", "do", "does", "did", "is", "isn", "am", "are", "was", "were",
        // cardinal numbers
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
        "hundred", "thousand", "million", "billion", "trillion",
        // conjunctions
        "and", "or", "but", "for", "nor", "so", "yet", "while", "because",
        // determiners
        "this", "that", "these", "those", "the", "an", "a", "there",
        // modals
        "can", "should", "will", "may", "shall", "might", "must", "could", "would",
        // predeterminers
        "some", "many", "any", "each", "all", "few", "most", "both", "half", "none", "twice",
        // prepositions
        "at", "before", "after", "behind", "beneath", "beside", "between", "into", "through",
        "across", "of", "concerning", "like", "unlike", "except", "with", "within", "without",
        "toward", "to", "past", "against", "during", "until", "throughout", "below", "besides",
        "beyond", "from", "inside", "near", "outside", "since", "upon",
        // pronouns
        "my", "our", "your", "her", "their", "whose", "i", "you", "he", "she", "it", "them",
        "they", "we", "us", "mine", "yours", "his", "hers", "its", "ours", "theirs",
        // particles
        "about", "off", "up", "along", "away", "back", "by", "down", "forward", "in", "on",
        "out", "over", "around", "under",
        // wh- words
        "what", "whatever", "which", "whichever", "who", "whom", "whoever", "whomever", "how",
        "where", "when", "however", "wherever", "whenever",
        // misc
        "no", "not", "oh", "mr", "mrs", "miss", "dr", "as", "only", "also", "either", "neither",
        "whether",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token.to_lowercase().as_str())
}

/// A token worth counting: longer than one character, holds a letter and
/// is not a stop word.
pub fn is_rarable(token: &str) -> bool {
    token.chars().nth(1).is_some()
        && token.chars().any(char::is_alphabetic)
        && !is_stop_word(token)
}

/// Corpus-wide occurrence count of every rarable token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFrequencyTable {
    counts: HashMap<String, u64>,
}

impl TokenFrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the whitespace tokens of every synonym. O(total tokens).
    pub fn from_synonyms<'a, I>(synonyms: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::new();
        for synonym in synonyms {
            for token in synonym.split_whitespace() {
                table.record(token);
            }
        }
        table
    }

    /// Adds one occurrence of `token`; unrarable tokens are ignored.
    pub fn record(&mut self, token: &str) {
        if is_rarable(token) {
            *self.counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    /// Overrides a count.
    pub fn set(&mut self, token: &str, count: u64) {
        self.counts.insert(token.to_string(), count);
    }

    pub fn count(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, u64)> for TokenFrequencyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (token, count) in iter {
            table.set(token, count);
        }
        table
    }
}
