//! Whole-run totals: logged at the end, optionally shown as a table or JSON

use std::io::Write;
use std::time::Duration;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use serde::Serialize;

use crate::codec::CodecKind;
use crate::error::Result;
use crate::harness::ratio;

/// Totals for one codec across the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodecTotals {
    pub codec: &'static str,
    /// Compressed words summed over all documents
    pub words: u64,
    /// `words * 32 / total integers`
    pub bits_per_integer: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub documents_seen: usize,
    /// Documents without a body
    pub documents_skipped: usize,
    /// Records written to the report
    pub documents_emitted: usize,
    pub tokens_seen: u64,
    /// Tokens found in the dictionary
    pub tokens_encoded: u64,
    pub integers: u64,
    /// Entropy averaged over documents, weighted by their length
    pub weighted_entropy: f64,
    pub codecs: Vec<CodecTotals>,
    pub elapsed_secs: f64,
    #[serde(skip)]
    entropy_mass: f64,
}

impl RunSummary {
    pub fn new(roster: &[CodecKind]) -> Self {
        Self {
            codecs: roster
                .iter()
                .map(|kind| CodecTotals {
                    codec: kind.name(),
                    words: 0,
                    bits_per_integer: 0.0,
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn record_skipped(&mut self) {
        self.documents_seen += 1;
        self.documents_skipped += 1;
    }

    /// Account one measured document; `words` is in roster order
    pub fn record_document(&mut self, tokens_seen: usize, length: usize, entropy: f64, words: &[usize]) {
        self.documents_seen += 1;
        self.documents_emitted += 1;
        self.tokens_seen += tokens_seen as u64;
        self.tokens_encoded += length as u64;
        self.integers += length as u64;
        self.entropy_mass += entropy * length as f64;
        for (totals, &w) in self.codecs.iter_mut().zip(words) {
            totals.words += w as u64;
        }
    }

    /// Compute the derived averages
    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed_secs = elapsed.as_secs_f64();
        self.weighted_entropy = if self.integers == 0 {
            0.0
        } else {
            self.entropy_mass / self.integers as f64
        };
        let integers = self.integers as usize;
        for totals in &mut self.codecs {
            totals.bits_per_integer = ratio(totals.words as usize, integers);
        }
    }

    /// Fraction of tokens that were in the dictionary
    pub fn coverage(&self) -> f64 {
        if self.tokens_seen == 0 {
            0.0
        } else {
            self.tokens_encoded as f64 / self.tokens_seen as f64
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(
                ["Codec", "Words", "Bits/int", "vs entropy"]
                    .iter()
                    .map(|h| Cell::new(*h).fg(Color::Cyan)),
            );

        let best = self
            .codecs
            .iter()
            .map(|c| c.bits_per_integer)
            .fold(f64::INFINITY, f64::min);
        for totals in &self.codecs {
            let bpi = Cell::new(format!("{:.2}", totals.bits_per_integer));
            let bpi = if totals.bits_per_integer == best && self.integers > 0 {
                bpi.fg(Color::Green)
            } else {
                bpi
            };
            let overhead = if self.weighted_entropy > 0.0 {
                format!("{:.2}x", totals.bits_per_integer / self.weighted_entropy)
            } else {
                "-".to_string()
            };
            table.add_row(vec![
                Cell::new(totals.codec),
                Cell::new(totals.words),
                bpi,
                Cell::new(overhead),
            ]);
        }
        table
    }

    pub fn write_json<W: Write>(&self, out: W) -> Result<()> {
        serde_json::to_writer_pretty(out, self).map_err(std::io::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunSummary {
        let mut summary = RunSummary::new(&[CodecKind::Simple9, CodecKind::Copy]);
        summary.record_skipped();
        summary.record_document(6, 4, 0.0, &[1, 4]);
        summary.record_document(4, 4, 2.0, &[2, 4]);
        summary.record_document(3, 0, 0.0, &[0, 0]);
        summary.finish(Duration::from_millis(1500));
        summary
    }

    #[test]
    fn test_totals() {
        let summary = sample();
        assert_eq!(summary.documents_seen, 4);
        assert_eq!(summary.documents_skipped, 1);
        assert_eq!(summary.documents_emitted, 3);
        assert_eq!(summary.tokens_seen, 13);
        assert_eq!(summary.integers, 8);
        assert_eq!(summary.weighted_entropy, 1.0);
        assert_eq!(summary.codecs[0].words, 3);
        assert_eq!(summary.codecs[0].bits_per_integer, 12.0);
        assert_eq!(summary.codecs[1].bits_per_integer, 32.0);
        assert!((summary.coverage() - 8.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_run() {
        let mut summary = RunSummary::new(&CodecKind::ALL);
        summary.finish(Duration::ZERO);
        assert_eq!(summary.weighted_entropy, 0.0);
        assert!(summary.codecs.iter().all(|c| c.bits_per_integer == 0.0));
        assert_eq!(summary.coverage(), 0.0);
    }

    #[test]
    fn test_table_lists_every_codec() {
        let rendered = sample().to_table().to_string();
        assert!(rendered.contains("simple9"));
        assert!(rendered.contains("copy"));
        assert!(rendered.contains("12.00"));
    }

    #[test]
    fn test_json_export() {
        let mut out = Vec::new();
        sample().write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["documents_emitted"], 3);
        assert_eq!(value["codecs"][1]["codec"], "copy");
        assert_eq!(value["codecs"][1]["bits_per_integer"], 32.0);
        assert!(value.get("entropy_mass").is_none());
    }
}
