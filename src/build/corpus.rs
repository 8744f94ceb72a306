// File: src/build/corpus.rs
//! Reader for pipe-separated concept corpora.
//!
//! Each row is `CUI|TUI|SAB|TEXT`: concept code, semantic type, source
//! vocabulary and one synonym. Blank lines and lines starting with `#` are
//! ignored. Rows that cannot be used are logged and skipped so one bad line
//! never aborts a build.

use crate::build::concept::{Concept, ConceptMap};
use crate::build::frequency::is_stop_word;
use crate::build::term_tokenizer::tokenize_term;
use crate::config::BuildConfig;
use crate::core::cui::parse_cui;
use crate::core::types::CuiCode;
use crate::error::{LookupError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Longest synonym text that is considered at all.
const MAX_TEXT_LENGTH: usize = 255;

const PLURAL_MARKER: &str = "( s )";

/// One parsed corpus row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRow {
    pub code: CuiCode,
    pub semantic_type: String,
    pub source: String,
    pub text: String,
}

/// Parses one non-comment line. `line_number` is only used for errors.
pub fn parse_row(line: &str, line_number: usize) -> Result<CorpusRow> {
    let fields: Vec<&str> = line.splitn(4, '|').collect();
    if fields.len() < 4 {
        return Err(LookupError::Corpus {
            line: line_number,
            message: format!("expected 4 fields, found {}", fields.len()),
        });
    }
    let code = parse_cui(fields[0]).map_err(|e| LookupError::Corpus {
        line: line_number,
        message: e.to_string(),
    })?;
    Ok(CorpusRow {
        code,
        semantic_type: fields[1].trim().to_string(),
        source: fields[2].trim().to_string(),
        text: fields[3].trim().to_string(),
    })
}

/// Printable ASCII, at least one letter, not a lone stop word and not a bare
/// parenthesized character.
pub fn is_text_valid(text: &str) -> bool {
    if text.len() > MAX_TEXT_LENGTH {
        return false;
    }
    if !text.bytes().all(|b| (b' '..=b'~').contains(&b)) {
        return false;
    }
    if !text.bytes().any(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    if text.len() == 3 && text.starts_with('(') {
        return false;
    }
    !is_stop_word(text)
}

pub fn is_text_too_short(text: &str, min_char_length: usize) -> bool {
    text.chars().count() < min_char_length
}

/// Too long overall, or holding an overlong token, too many words or too
/// many one- and two-character symbols.
pub fn is_text_too_long(text: &str, config: &BuildConfig) -> bool {
    if text.len() > MAX_TEXT_LENGTH {
        return true;
    }
    let mut words = 0;
    let mut symbols = 0;
    for token in text.split_whitespace() {
        let length = token.chars().count();
        if length > config.max_char_length {
            return true;
        }
        if length > 2 {
            words += 1;
        } else {
            symbols += 1;
        }
    }
    words > config.max_word_count || symbols > config.max_sym_count
}

/// Lowercased, tokenized forms of a raw synonym that pass the length
/// filters. A trailing `( s )` yields both the singular and the plural.
pub fn formatted_texts(text: &str, config: &BuildConfig) -> Vec<String> {
    let tokenized = tokenize_term(&text.to_lowercase());
    let forms = match tokenized.strip_suffix(PLURAL_MARKER) {
        Some(stem) => {
            let stem = stem.trim_end();
            vec![stem.to_string(), format!("{}s", stem)]
        }
        None => vec![tokenized],
    };
    forms
        .into_iter()
        .filter(|form| !form.is_empty())
        .filter(|form| !is_text_too_short(form, config.min_char_length))
        .filter(|form| !is_text_too_long(form, config))
        .collect()
}

/// Counters of one corpus read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub texts_rejected: usize,
}

pub struct CorpusReader {
    config: BuildConfig,
    wanted_sources: HashSet<String>,
}

impl CorpusReader {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            config: config.clone(),
            wanted_sources: config.wanted_sources.iter().cloned().collect(),
        }
    }

    fn is_wanted(&self, source: &str) -> bool {
        self.wanted_sources.is_empty() || self.wanted_sources.contains(source)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_path(&self, path: &Path) -> Result<(ConceptMap, CorpusStats)> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Reads every row into concepts, counting each accepted synonym form.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<(ConceptMap, CorpusStats)> {
        let mut concepts = ConceptMap::new();
        let mut stats = CorpusStats::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let row = match parse_row(trimmed, index + 1) {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping row: {}", e);
                    stats.rows_skipped += 1;
                    continue;
                }
            };
            stats.rows_read += 1;
            if !self.is_wanted(&row.source) {
                continue;
            }
            let lowered = row.text.to_lowercase();
            if !is_text_valid(&lowered) {
                debug!("Rejected text '{}' for {}", row.text, row.code);
                stats.texts_rejected += 1;
                continue;
            }
            let forms = formatted_texts(&lowered, &self.config);
            if forms.is_empty() {
                stats.texts_rejected += 1;
                continue;
            }
            let concept = concepts
                .entry(row.code)
                .or_insert_with(|| Concept::new(row.code));
            if !row.semantic_type.is_empty() {
                concept.add_semantic_type(&row.semantic_type);
            }
            concept.add_vocabulary(&row.source);
            for form in &forms {
                concept.add_text(form);
            }
        }
        info!(
            "Read {} rows into {} concepts ({} skipped, {} texts rejected)",
            stats.rows_read,
            concepts.len(),
            stats.rows_skipped,
            stats.texts_rejected
        );
        Ok((concepts, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_and_reports_bad_ones() {
        let row = parse_row("C0005767|T031|SNOMEDCT_US|Blood", 1).unwrap();
        assert_eq!(row.code, 5767);
        assert_eq!(row.semantic_type, "T031");
        assert_eq!(row.text, "Blood");

        let row = parse_row("C0000001|T047|MSH|a|b", 2).unwrap();
        assert_eq!(row.text, "a|b");

        assert!(matches!(
            parse_row("C0000001|T047", 3),
            Err(LookupError::Corpus { line: 3, .. })
        ));
        assert!(matches!(
            parse_row("X1|T047|MSH|text", 4),
            Err(LookupError::Corpus { line: 4, .. })
        ));
    }

    #[test]
    fn validity_rules() {
        assert!(is_text_valid("blood culture"));
        assert!(!is_text_valid("123"));
        assert!(!is_text_valid("caf\u{e9}"));
        assert!(!is_text_valid("the"));
        assert!(!is_text_valid("(a)"));
        assert!(!is_text_valid(&"a".repeat(256)));
    }

    #[test]
    fn length_rules() {
        let config = BuildConfig::default();
        assert!(is_text_too_short("a", config.min_char_length));
        assert!(!is_text_too_short("ab", config.min_char_length));
        assert!(is_text_too_long(&"a".repeat(49), &config));
        assert!(is_text_too_long(&vec!["word"; 13].join(" "), &config));
        assert!(!is_text_too_long(&vec!["word"; 12].join(" "), &config));
        assert!(is_text_too_long(&vec!["x"; 8].join(" "), &config));
    }

    #[test]
    fn plural_marker_gives_both_forms() {
        let config = BuildConfig::default();
        assert_eq!(formatted_texts("Finding(s)", &config), vec!["finding", "findings"]);
        assert_eq!(formatted_texts("Crohn's Disease", &config), vec!["crohn 's disease"]);
    }

    #[test]
    fn reader_builds_concepts_with_counts() {
        let corpus = "\
# cui|tui|sab|text
C0005767|T031|SNOMEDCT_US|Blood

C0005767|T031|MSH|blood
C0005767|T031|MSH|Whole blood
C0000002|T047|ICD10|Ignored elsewhere
C0000003|T047
C0000004|T047|MSH|12
";
        let mut config = BuildConfig::default();
        config.wanted_sources = vec!["SNOMEDCT_US".to_string(), "MSH".to_string()];
        let reader = CorpusReader::new(&config);
        let (concepts, stats) = reader.read(Cursor::new(corpus)).unwrap();

        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.texts_rejected, 1);
        assert_eq!(concepts.len(), 1);

        let blood = &concepts[&5767];
        assert_eq!(blood.count("blood"), 2);
        assert_eq!(blood.count("whole blood"), 1);
        assert!(blood.semantic_types().contains("T031"));
        assert_eq!(blood.vocabularies().len(), 2);
    }
}
