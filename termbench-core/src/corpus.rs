//! Document sources for the benchmark driver
//!
//! A source hands out documents one at a time; `Ok(None)` marks the end of
//! the corpus. The concrete source reads JSON lines, optionally through a
//! gzip or zstd decoder picked from the file extension.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde_json::Value;

use crate::error::{Error, Result};

/// Field holding the document text unless configured otherwise
pub const DEFAULT_BODY_FIELD: &str = "body";

/// One corpus record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// `None` when the record has no usable body; such documents are skipped
    pub body: Option<String>,
}

impl Document {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Pull-based document stream
pub trait DocumentSource {
    /// Next document, or `None` once the corpus is exhausted
    fn next_document(&mut self) -> Result<Option<Document>>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn next_document(&mut self) -> Result<Option<Document>> {
        (**self).next_document()
    }
}

/// One JSON object per line.
///
/// A missing, null or non-string body field yields a document without a
/// body. Blank lines are ignored. Malformed JSON aborts with
/// [`Error::Corpus`].
pub struct JsonlSource<R: BufRead> {
    reader: R,
    body_field: String,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(reader: R, body_field: impl Into<String>) -> Self {
        Self {
            reader,
            body_field: body_field.into(),
            line: String::new(),
            line_number: 0,
        }
    }

    /// Lines read so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn extract_body(&self, value: Value) -> Option<String> {
        match value {
            Value::Object(mut map) => match map.remove(&self.body_field) {
                Some(Value::String(body)) => Some(body),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<R: BufRead> DocumentSource for JsonlSource<R> {
    fn next_document(&mut self) -> Result<Option<Document>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(trimmed).map_err(|e| Error::Corpus {
                line: self.line_number,
                message: e.to_string(),
            })?;
            return Ok(Some(Document {
                body: self.extract_body(value),
            }));
        }
    }
}

/// Decoder chosen for a corpus file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusCompression {
    None,
    Gzip,
    Zstd,
}

impl CorpusCompression {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") | Some("gzip") => CorpusCompression::Gzip,
            Some("zst") | Some("zstd") => CorpusCompression::Zstd,
            _ => CorpusCompression::None,
        }
    }
}

/// Open a JSONL corpus, decompressing `.gz` and `.zst` files on the fly
pub fn open_corpus(
    path: impl AsRef<Path>,
    body_field: &str,
) -> Result<JsonlSource<Box<dyn BufRead>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let compression = CorpusCompression::from_path(path);
    log::debug!("Opening corpus {:?} ({:?})", path, compression);

    let reader: Box<dyn BufRead> = match compression {
        CorpusCompression::None => Box::new(BufReader::new(file)),
        CorpusCompression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        CorpusCompression::Zstd => Box::new(BufReader::new(zstd::stream::read::Decoder::new(file)?)),
    };
    Ok(JsonlSource::new(reader, body_field))
}

/// In-memory source, mainly for tests
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: VecDeque<Document>,
}

impl MemorySource {
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    /// Documents whose bodies are the given strings
    pub fn from_bodies<S: Into<String>>(bodies: impl IntoIterator<Item = S>) -> Self {
        Self::new(bodies.into_iter().map(Document::with_body))
    }
}

impl DocumentSource for MemorySource {
    fn next_document(&mut self) -> Result<Option<Document>> {
        Ok(self.documents.pop_front())
    }
}
