//! Termbench - measure integer codecs on a dictionary-coded text corpus
//!
//! # Overview
//!
//! Every document of a JSONL corpus is tokenized, each token is replaced by
//! its code in a frequency-ordered dictionary, and the resulting sequence is
//! compressed by every codec of the roster. One tab-separated line per
//! document goes to stdout:
//!
//! ```text
//! # length	entropy	bpi(binarypacking)	bpi(newpfd)	...
//! 412	7.91	10.25	9.63	...
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `info` level).
//!
//! # Examples
//!
//! ```bash
//! termbench wiki.jsonl.zst terms.tsv > report.tsv
//! termbench wiki.jsonl terms.tsv --codecs simple9,vbyte,copy --verify --summary
//! ```

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use termbench_core::{
    AnalyzerKind, Benchmark, BenchmarkConfig, CodecKind, Dictionary, ReportWriter, StopWords,
    open_corpus,
};

#[derive(Parser, Debug)]
#[command(name = "termbench")]
#[command(version, about = "Benchmark integer codecs on dictionary-coded text")]
struct Cli {
    /// JSONL corpus, optionally .gz or .zst compressed
    corpus: PathBuf,

    /// Dictionary file: one `frequency<TAB>term` per line, most frequent first
    dictionary: PathBuf,

    /// Number of dictionary lines to read
    #[arg(short = 'n', long, default_value = "1000000")]
    max_terms: usize,

    /// Comma-separated codec roster, in report order
    #[arg(short, long, default_value = "binarypacking,newpfd,optpfd,simple9,vbyte,copy")]
    codecs: String,

    /// JSON field holding the document text
    #[arg(short, long, default_value = "body")]
    body_field: String,

    /// Tokenizer: standard (lowercase, strip punctuation) or whitespace
    #[arg(short, long, default_value = "standard")]
    analyzer: String,

    /// Stop words dropped by the standard analyzer: classic, extended, none
    #[arg(long, default_value = "classic")]
    stop_words: String,

    /// Extra output words granted to each codec call
    #[arg(long, default_value = "1024")]
    slack: usize,

    /// Decompress every sequence and check it matches the input
    #[arg(long, default_value = "false")]
    verify: bool,

    /// Log progress every N documents (0 to disable)
    #[arg(short, long, default_value = "100000")]
    progress: usize,

    /// Print a per-codec summary table to stderr at the end
    #[arg(long, default_value = "false")]
    summary: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Cli {
    fn to_config(&self) -> Result<BenchmarkConfig> {
        let codecs = CodecKind::parse_list(&self.codecs)
            .with_context(|| format!("Invalid codec roster '{}'", self.codecs))?;
        let analyzer = AnalyzerKind::parse(&self.analyzer).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid analyzer '{}'. Valid options: standard, whitespace",
                self.analyzer
            )
        })?;
        let stop_words = StopWords::parse(&self.stop_words).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid stop words '{}'. Valid options: classic, extended, none",
                self.stop_words
            )
        })?;

        Ok(BenchmarkConfig {
            max_terms: self.max_terms,
            output_slack: self.slack,
            codecs,
            body_field: self.body_field.clone(),
            analyzer,
            stop_words,
            verify: self.verify,
            progress_interval: self.progress,
        })
    }
}

/// Why an input file cannot be used
#[derive(Debug, PartialEq, Eq)]
enum InputProblem {
    Missing,
    Unreadable,
}

fn check_input(path: &Path) -> Option<InputProblem> {
    if !path.exists() {
        Some(InputProblem::Missing)
    } else if File::open(path).is_err() {
        Some(InputProblem::Unreadable)
    } else {
        None
    }
}

/// Print the plain-text notice for an unusable input; true if one was printed
fn report_input_problem(path: &Path) -> bool {
    let display = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match check_input(path) {
        Some(InputProblem::Missing) => {
            println!("Can't find {}", display.display());
            true
        }
        Some(InputProblem::Unreadable) => {
            println!("Can't read {}", display.display());
            true
        }
        None => false,
    }
}

fn run(cli: Cli) -> Result<()> {
    if report_input_problem(&cli.corpus) || report_input_problem(&cli.dictionary) {
        return Ok(());
    }

    let config = cli.to_config()?;

    let dictionary = Dictionary::load(&cli.dictionary, config.max_terms)
        .with_context(|| format!("Failed to load dictionary {:?}", cli.dictionary))?;
    info!(
        "Loaded {} terms from {:?} (max {})",
        dictionary.len(),
        cli.dictionary,
        config.max_terms
    );

    let mut source = open_corpus(&cli.corpus, &config.body_field)
        .with_context(|| format!("Failed to open corpus {:?}", cli.corpus))?;
    info!(
        "Codecs: {} | analyzer: {} (stop words: {}) | verify: {}",
        config
            .codecs
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(","),
        config.analyzer,
        config.stop_words,
        config.verify
    );

    let mut benchmark = Benchmark::new(config, dictionary)?;
    let stdout = io::stdout();
    let mut report = ReportWriter::new(BufWriter::new(stdout.lock()));
    let summary = benchmark
        .run(&mut source, &mut report)
        .with_context(|| format!("Benchmark failed on {:?}", cli.corpus))?;

    if cli.summary {
        eprintln!("{}", summary.to_table());
        eprintln!(
            "  {} documents, {} integers, entropy {:.2} bits, dictionary coverage {:.1}%",
            summary.documents_emitted,
            summary.integers,
            summary.weighted_entropy,
            summary.coverage() * 100.0
        );
    }

    if let Some(path) = &cli.summary_json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary file {:?}", path))?;
        summary
            .write_json(BufWriter::new(file))
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        info!("Wrote summary to {:?}", path);
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("termbench=info".parse()?)
                .add_directive("termbench_core=info".parse()?),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // usage, --help and --version all end the run normally
            err.print()?;
            return Ok(());
        }
    };

    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_map_to_config() {
        let cli = Cli::try_parse_from(["termbench", "corpus.jsonl", "terms.tsv"]).unwrap();
        let config = cli.to_config().unwrap();
        assert_eq!(config.codecs, CodecKind::ALL.to_vec());
        assert_eq!(config.max_terms, 1_000_000);
        assert_eq!(config.output_slack, 1024);
        assert_eq!(config.analyzer, AnalyzerKind::Standard);
        assert_eq!(config.stop_words, StopWords::Classic);
        assert!(!config.verify);
    }

    #[test]
    fn test_cli_requires_both_paths() {
        assert!(Cli::try_parse_from(["termbench"]).is_err());
        assert!(Cli::try_parse_from(["termbench", "corpus.jsonl"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_names() {
        let cli =
            Cli::try_parse_from(["termbench", "c", "d", "--codecs", "copy,lz4"]).unwrap();
        assert!(cli.to_config().is_err());
        let cli =
            Cli::try_parse_from(["termbench", "c", "d", "--analyzer", "ngram"]).unwrap();
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_check_input() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("terms.tsv");
        std::fs::write(&present, "1\tthe\n").unwrap();

        assert_eq!(check_input(&present), None);
        assert_eq!(
            check_input(&dir.path().join("absent.tsv")),
            Some(InputProblem::Missing)
        );
    }

    #[test]
    fn test_missing_input_returns_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            PathBuf::from("termbench"),
            dir.path().join("absent.jsonl"),
            dir.path().join("absent.tsv"),
        ])
        .unwrap();
        run(cli).unwrap();
    }
}
