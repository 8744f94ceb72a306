use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use lookup_core::core::cui::format_cui;
use lookup_core::persistence::{load_store, save_store};
use lookup_core::{
    DictionaryBuilder, DictionaryConfig, HitMap, LookupEngine, MatchStrategy, RawToken,
    TokenClass,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lookup_engine", version, about = "Rare-word dictionary term lookup")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a term store from a CUI|TUI|SAB|TEXT corpus
    Build {
        #[arg(long)]
        corpus: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
    /// Find dictionary terms in a text file, one window per line
    Lookup {
        #[arg(long)]
        store: PathBuf,

        /// Input text; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Process windows on all cores
        #[arg(long)]
        parallel: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Exact,
    Overlap,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exact => MatchStrategy::Exact,
            StrategyArg::Overlap => MatchStrategy::Overlap,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Serialize)]
struct HitRecord {
    begin: usize,
    end: usize,
    text: String,
    gaps: Vec<(usize, usize)>,
    cuis: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => DictionaryConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DictionaryConfig::default(),
    };

    match cli.command {
        Commands::Build { corpus, out } => run_build(config, &corpus, &out),
        Commands::Lookup {
            store,
            input,
            strategy,
            format,
            parallel,
        } => run_lookup(config, &store, input.as_deref(), strategy, format, parallel),
    }
}

fn run_build(config: DictionaryConfig, corpus: &Path, out: &Path) -> Result<()> {
    let builder = DictionaryBuilder::new(config.build).context("Invalid build configuration")?;
    let (store, report) = builder
        .build_from_path(corpus)
        .with_context(|| format!("Failed to read corpus {}", corpus.display()))?;
    save_store(&store, out).with_context(|| format!("Failed to save {}", out.display()))?;
    info!(
        "{} terms under {} anchors; {} synonyms dropped, {} resolved away",
        report.index.terms_indexed,
        report.index.distinct_anchors,
        report.index.synonyms_dropped,
        report.resolution.synonyms_removed
    );
    Ok(())
}

fn run_lookup(
    mut config: DictionaryConfig,
    store_path: &Path,
    input: Option<&Path>,
    strategy: Option<StrategyArg>,
    format: OutputFormat,
    parallel: bool,
) -> Result<()> {
    if let Some(strategy) = strategy {
        config.lookup.strategy = strategy.into();
    }
    let store = load_store(store_path)
        .with_context(|| format!("Failed to load term store {}", store_path.display()))?;
    let engine = LookupEngine::from_config(Arc::new(store), &config.lookup);

    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let windows = tokenize_windows(&text);
    let hits = if parallel {
        engine.process_windows_parallel(&windows)
    } else {
        engine.process_windows(windows.into_iter().map(Ok))
    };

    let chars: Vec<char> = text.chars().collect();
    let records = hit_records(&hits, &chars);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Pretty => print_pretty(&records),
    }
    Ok(())
}

/// Splits text into one window per line. Offsets are character offsets into
/// the whole text.
fn tokenize_windows(text: &str) -> Vec<Vec<RawToken>> {
    let mut windows = Vec::new();
    let mut window = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    for (offset, c) in text.chars().enumerate() {
        if c.is_alphanumeric() {
            if current.is_empty() {
                start = offset;
            }
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            window.push(word_token(&std::mem::take(&mut current), start));
        }
        if c == '\n' {
            windows.push(std::mem::take(&mut window));
        } else if !c.is_whitespace() {
            let class = if c.is_ascii_punctuation() {
                TokenClass::Punctuation
            } else {
                TokenClass::Symbol
            };
            window.push(RawToken::with_class(&c.to_string(), offset, class));
        }
    }
    if !current.is_empty() {
        window.push(word_token(&current, start));
    }
    if !window.is_empty() {
        windows.push(window);
    }
    windows
}

fn word_token(text: &str, start: usize) -> RawToken {
    if text.chars().all(|c| c.is_ascii_digit()) {
        RawToken::with_class(text, start, TokenClass::Number)
    } else {
        RawToken::word(text, start)
    }
}

fn hit_records(hits: &HitMap, chars: &[char]) -> Vec<HitRecord> {
    hits.iter()
        .map(|(span, codes)| {
            let outer = span.span();
            HitRecord {
                begin: outer.start,
                end: outer.end,
                text: chars
                    .get(outer.start..outer.end)
                    .map(|slice| slice.iter().collect())
                    .unwrap_or_default(),
                gaps: span.gaps().iter().map(|gap| (gap.start, gap.end)).collect(),
                cuis: codes.iter().map(|code| format_cui(*code)).collect(),
            }
        })
        .collect()
}

fn print_pretty(records: &[HitRecord]) {
    if records.is_empty() {
        println!("{}", "No terms found.".dark_grey());
        return;
    }
    for record in records {
        let marker = if record.gaps.is_empty() { " " } else { "~" };
        println!(
            "{:>6}-{:<6}{} {}  {}",
            record.begin,
            record.end,
            marker,
            record.text.as_str().bold(),
            record.cuis.join(",").green()
        );
    }
}
