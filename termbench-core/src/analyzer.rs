//! Text analysis: turns a document body into a lazy stream of tokens

use std::borrow::Cow;
use std::fmt;

use rustc_hash::FxHashSet;
use stop_words::LANGUAGE;

/// English stop words of the classic standard analyzer
pub const CLASSIC_STOP_WORDS: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Stop-word list applied by [`Analyzer::Standard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopWords {
    None,
    #[default]
    Classic,
    Extended,
}

impl StopWords {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "off" => Some(StopWords::None),
            "classic" | "default" => Some(StopWords::Classic),
            "extended" | "english" => Some(StopWords::Extended),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StopWords::None => "none",
            StopWords::Classic => "classic",
            StopWords::Extended => "extended",
        }
    }

    fn words(self) -> FxHashSet<String> {
        match self {
            StopWords::None => FxHashSet::default(),
            StopWords::Classic => CLASSIC_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            StopWords::Extended => stop_words::get(LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl fmt::Display for StopWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analyzer selector, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerKind {
    Whitespace,
    #[default]
    Standard,
}

impl AnalyzerKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "whitespace" | "simple" => Some(AnalyzerKind::Whitespace),
            "standard" => Some(AnalyzerKind::Standard),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnalyzerKind::Whitespace => "whitespace",
            AnalyzerKind::Standard => "standard",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits text into the tokens looked up in the dictionary
#[derive(Debug, Clone)]
pub enum Analyzer {
    /// Whitespace-separated words, untouched
    Whitespace,
    /// Whitespace split, punctuation stripped, lowercased, stop words removed
    Standard { stop_words: FxHashSet<String> },
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(AnalyzerKind::default(), StopWords::default())
    }
}

impl Analyzer {
    pub fn new(kind: AnalyzerKind, stop_words: StopWords) -> Self {
        match kind {
            AnalyzerKind::Whitespace => Analyzer::Whitespace,
            AnalyzerKind::Standard => Analyzer::Standard {
                stop_words: stop_words.words(),
            },
        }
    }

    /// Lazily tokenize `text`
    pub fn tokens<'a>(&'a self, text: &'a str) -> Tokens<'a> {
        Tokens {
            analyzer: self,
            words: text.split_whitespace(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        match self {
            Analyzer::Whitespace => false,
            Analyzer::Standard { stop_words } => stop_words.contains(word),
        }
    }
}

/// Token iterator returned by [`Analyzer::tokens`]
pub struct Tokens<'a> {
    analyzer: &'a Analyzer,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.analyzer {
            Analyzer::Whitespace => self.words.next().map(Cow::Borrowed),
            Analyzer::Standard { stop_words } => {
                for word in self.words.by_ref() {
                    let cleaned = clean_word(word);
                    if !cleaned.is_empty() && !stop_words.contains(cleaned.as_ref()) {
                        return Some(cleaned);
                    }
                }
                None
            }
        }
    }
}

/// Strip non-alphanumeric characters and lowercase.
///
/// Borrows when the word is already clean ASCII; falls back to `char`
/// iteration only for non-ASCII input.
#[inline]
fn clean_word(word: &str) -> Cow<'_, str> {
    if word.is_ascii() {
        let bytes = word.as_bytes();
        if bytes
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        {
            return Cow::Borrowed(word);
        }
        let mut result = String::with_capacity(word.len());
        for &b in bytes {
            if b.is_ascii_alphanumeric() {
                result.push(b.to_ascii_lowercase() as char);
            }
        }
        Cow::Owned(result)
    } else {
        Cow::Owned(
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(|c| c.to_lowercase())
                .collect(),
        )
    }
}
