//! Benchmark run configuration

use crate::analyzer::{Analyzer, AnalyzerKind, StopWords};
use crate::codec::CodecKind;
use crate::corpus::DEFAULT_BODY_FIELD;
use crate::dictionary::DEFAULT_MAX_TERMS;
use crate::error::{Error, Result};
use crate::harness::DEFAULT_OUTPUT_SLACK;

/// Settings for one benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Dictionary lines read at most
    pub max_terms: usize,
    /// Output words granted to a codec beyond the input length
    pub output_slack: usize,
    /// Codecs measured, in report column order
    pub codecs: Vec<CodecKind>,
    /// JSON field holding the document text
    pub body_field: String,
    pub analyzer: AnalyzerKind,
    pub stop_words: StopWords,
    /// Decompress every measured sequence and compare
    pub verify: bool,
    /// Log progress every N documents (0 disables)
    pub progress_interval: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            max_terms: DEFAULT_MAX_TERMS,
            output_slack: DEFAULT_OUTPUT_SLACK,
            codecs: CodecKind::ALL.to_vec(),
            body_field: DEFAULT_BODY_FIELD.to_string(),
            analyzer: AnalyzerKind::default(),
            stop_words: StopWords::default(),
            verify: false,
            progress_interval: 100_000,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.codecs.is_empty() {
            return Err(Error::Config("codec roster is empty".to_string()));
        }
        if self.body_field.is_empty() {
            return Err(Error::Config("body field name is empty".to_string()));
        }
        Ok(())
    }

    pub fn build_analyzer(&self) -> Analyzer {
        Analyzer::new(self.analyzer, self.stop_words)
    }
}
