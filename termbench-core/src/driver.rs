//! Corpus driver: tokenize, encode, measure and report one document at a time

use std::io::Write;
use std::time::Instant;

use crate::Symbol;
use crate::analyzer::Analyzer;
use crate::codec::{CodecKind, IntegerCodec};
use crate::config::BenchmarkConfig;
use crate::corpus::DocumentSource;
use crate::dictionary::Dictionary;
use crate::encoder::encode_tokens;
use crate::entropy::entropy;
use crate::error::Result;
use crate::harness::{OutputBuffer, compressed_words, ratio, verify_round_trip};
use crate::report::{BenchmarkRecord, ReportWriter};
use crate::summary::RunSummary;

/// A configured benchmark over one dictionary.
///
/// Owns the codec instances and every per-document buffer, so a run
/// allocates only when a document is longer than any seen before.
pub struct Benchmark {
    config: BenchmarkConfig,
    dictionary: Dictionary,
    analyzer: Analyzer,
    codecs: Vec<Box<dyn IntegerCodec>>,
    sequence: Vec<Symbol>,
    output: OutputBuffer,
    scratch: Vec<u32>,
    words: Vec<usize>,
    bits: Vec<f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig, dictionary: Dictionary) -> Result<Self> {
        config.validate()?;
        let analyzer = config.build_analyzer();
        let codecs = config.codecs.iter().map(|kind| kind.build()).collect();
        let output = OutputBuffer::new(config.output_slack);
        let roster_len = config.codecs.len();
        Ok(Self {
            config,
            dictionary,
            analyzer,
            codecs,
            sequence: Vec::new(),
            output,
            scratch: Vec::new(),
            words: vec![0; roster_len],
            bits: vec![0.0; roster_len],
        })
    }

    pub fn roster(&self) -> &[CodecKind] {
        &self.config.codecs
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Write the report header, then one record per document with a body
    pub fn run<S, W>(&mut self, source: &mut S, report: &mut ReportWriter<W>) -> Result<RunSummary>
    where
        S: DocumentSource + ?Sized,
        W: Write,
    {
        let mut summary = RunSummary::new(&self.config.codecs);
        let start = Instant::now();
        let progress = self.config.progress_interval;

        report.write_header(&self.config.codecs)?;

        while let Some(document) = source.next_document()? {
            let Some(body) = document.body else {
                summary.record_skipped();
                continue;
            };

            let tokens_seen = encode_tokens(
                self.analyzer.tokens(&body),
                &self.dictionary,
                &mut self.sequence,
            );
            let length = self.sequence.len();
            let entropy = entropy(&self.sequence);
            self.measure()?;

            report.write_record(&BenchmarkRecord {
                length,
                entropy,
                bits_per_integer: &self.bits,
            })?;
            summary.record_document(tokens_seen, length, entropy, &self.words);

            if progress > 0 && summary.documents_seen.is_multiple_of(progress) {
                let rate = summary.documents_seen as f64 / start.elapsed().as_secs_f64();
                log::info!(
                    "Progress: {} documents ({:.0} docs/sec), {} integers",
                    summary.documents_seen,
                    rate,
                    summary.integers
                );
            }
        }

        report.flush()?;
        summary.finish(start.elapsed());
        log::info!(
            "Benchmarked {} documents ({} skipped) in {:.2}s, {} integers, entropy {:.2}",
            summary.documents_emitted,
            summary.documents_skipped,
            summary.elapsed_secs,
            summary.integers,
            summary.weighted_entropy
        );
        for totals in &summary.codecs {
            log::debug!("{}: {:.2} bits/int", totals.codec, totals.bits_per_integer);
        }
        Ok(summary)
    }

    /// Run every codec on the current sequence
    fn measure(&mut self) -> Result<()> {
        let length = self.sequence.len();
        for (i, codec) in self.codecs.iter().enumerate() {
            let words = compressed_words(&self.sequence, codec.as_ref(), &mut self.output)?;
            if self.config.verify {
                verify_round_trip(
                    &self.sequence,
                    codec.as_ref(),
                    &mut self.output,
                    &mut self.scratch,
                )?;
            }
            self.words[i] = words;
            self.bits[i] = ratio(words, length);
        }
        Ok(())
    }
}
