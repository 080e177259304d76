//! Bounded term dictionary loaded from a frequency-sorted term list
//!
//! The file holds one `frequency<TAB>term` entry per line, most frequent term
//! first. Terms receive dense codes 0, 1, 2, ... in file order, so frequent
//! terms get small codes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::Symbol;
use crate::error::{Error, Result};

/// Default dictionary bound (one million terms)
pub const DEFAULT_MAX_TERMS: usize = 1_000_000;

/// Immutable term -> code mapping
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    codes: FxHashMap<String, Symbol>,
}

impl Dictionary {
    /// Load at most `max_terms` entries from a dictionary file
    pub fn load(path: impl AsRef<Path>, max_terms: usize) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), max_terms)
    }

    /// Load at most `max_terms` entries from any line-oriented reader.
    ///
    /// Lines past the bound are never read. A line that is not exactly two
    /// tab-separated fields aborts the load with [`Error::Format`].
    pub fn from_reader<R: BufRead>(reader: R, max_terms: usize) -> Result<Self> {
        let mut codes = FxHashMap::default();
        let mut duplicates = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            if codes.len() >= max_terms {
                break;
            }
            let line = line?;
            let term = parse_line(&line).ok_or_else(|| Error::Format {
                line: idx + 1,
                content: line.clone(),
            })?;

            let next_code = codes.len() as Symbol;
            if codes.contains_key(term) {
                duplicates += 1;
                continue;
            }
            codes.insert(term.to_string(), next_code);
        }

        if duplicates > 0 {
            log::warn!("Dictionary: skipped {} repeated terms", duplicates);
        }
        log::debug!("Dictionary: loaded {} terms (bound {})", codes.len(), max_terms);

        Ok(Self { codes })
    }

    /// Code of `term`, or `None` when the term is outside the dictionary
    #[inline]
    pub fn lookup(&self, term: &str) -> Option<Symbol> {
        self.codes.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Split `freq<TAB>term`, returning the term
fn parse_line(line: &str) -> Option<&str> {
    let mut fields = line.split('\t');
    let _freq = fields.next()?;
    let term = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    Some(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const SAMPLE: &str = "5\tthe\n3\tof\n1\tcat\n";

    #[test]
    fn test_codes_follow_file_order() {
        let dict = Dictionary::from_reader(Cursor::new(SAMPLE), 1000).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.lookup("the"), Some(0));
        assert_eq!(dict.lookup("of"), Some(1));
        assert_eq!(dict.lookup("cat"), Some(2));
        assert_eq!(dict.lookup("dog"), None);
    }

    #[test]
    fn test_max_terms_truncates() {
        let dict = Dictionary::from_reader(Cursor::new(SAMPLE), 2).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.lookup("the"), Some(0));
        assert_eq!(dict.lookup("of"), Some(1));
        assert_eq!(dict.lookup("cat"), None);
    }

    #[test]
    fn test_lines_past_bound_are_not_parsed() {
        let content = "5\tthe\nbroken line without tab\n";
        let dict = Dictionary::from_reader(Cursor::new(content), 1).unwrap();
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_single_field_is_format_error() {
        let err = Dictionary::from_reader(Cursor::new("onlyonefield\n"), 10).unwrap_err();
        match err {
            Error::Format { line, content } => {
                assert_eq!(line, 1);
                assert_eq!(content, "onlyonefield");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_three_fields_is_format_error() {
        let content = "5\tthe\n3\tof\textra\n";
        let err = Dictionary::from_reader(Cursor::new(content), 10).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_repeated_term_keeps_first_code() {
        let content = "9\ta\n8\tb\n7\ta\n6\tc\n";
        let dict = Dictionary::from_reader(Cursor::new(content), 10).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.lookup("a"), Some(0));
        assert_eq!(dict.lookup("b"), Some(1));
        assert_eq!(dict.lookup("c"), Some(2));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let dict = Dictionary::load(file.path(), DEFAULT_MAX_TERMS).unwrap();
        assert_eq!(dict.lookup("cat"), Some(2));
    }

    #[test]
    fn test_crlf_line_endings() {
        let dict = Dictionary::from_reader(Cursor::new("5\tthe\r\n3\tof\r\n"), 10).unwrap();
        assert_eq!(dict.lookup("of"), Some(1));
    }
}
