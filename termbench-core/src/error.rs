//! Error types for termbench

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Format of dictionary should be freq<tab>term (line {line}: {content:?})")]
    Format { line: usize, content: String },

    #[error("Codec {codec} consumed {consumed} of {supplied} integers")]
    ContractViolation {
        codec: &'static str,
        consumed: usize,
        supplied: usize,
    },

    #[error("Codec {codec} ran out of output space ({capacity} words); raise the output slack")]
    OutputCapacity { codec: &'static str, capacity: usize },

    #[error("Codec {codec} cannot encode value {value}")]
    UnencodableValue { codec: &'static str, value: u32 },

    #[error("Corrupt compressed stream: {0}")]
    Corrupt(String),

    #[error("Codec {codec} round trip mismatch at position {position}")]
    RoundTrip { codec: &'static str, position: usize },

    #[error("Corpus error at line {line}: {message}")]
    Corpus { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
