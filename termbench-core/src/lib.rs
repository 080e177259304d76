//! Termbench - integer compression benchmark over dictionary-coded text
//!
//! Each document of a corpus is tokenized, mapped to dense term codes through
//! a frequency-ordered dictionary, and the resulting integer sequence is fed
//! to a roster of integer codecs:
//! - Bounded term dictionary (most frequent term gets code 0)
//! - Order-0 entropy of every sequence as the lower bound to compare against
//! - Block bit packing, patched frame-of-reference, Simple9, variable byte,
//!   and an identity control
//! - One tab-separated report line per document, plus run-wide totals

pub mod analyzer;
pub mod codec;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod driver;
pub mod encoder;
pub mod entropy;
pub mod error;
pub mod harness;
pub mod report;
pub mod summary;

/// A dictionary code
pub type Symbol = u32;

pub use analyzer::{Analyzer, AnalyzerKind, StopWords};
pub use codec::{CodecKind, IntegerCodec, Progress};
pub use config::BenchmarkConfig;
pub use corpus::{Document, DocumentSource, JsonlSource, MemorySource, open_corpus};
pub use dictionary::Dictionary;
pub use driver::Benchmark;
pub use encoder::encode_tokens;
pub use entropy::entropy;
pub use error::{Error, Result};
pub use harness::{OutputBuffer, bits_per_integer, verify_round_trip};
pub use report::{BenchmarkRecord, ReportWriter};
pub use summary::RunSummary;
