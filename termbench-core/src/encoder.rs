//! Token stream -> symbol sequence

use crate::Symbol;
use crate::dictionary::Dictionary;

/// Encode one document's tokens into `sequence`.
///
/// The sequence is cleared first and keeps its allocation. Tokens missing
/// from the dictionary are dropped, so the output can be shorter than the
/// token stream (or empty). Returns the number of tokens seen.
pub fn encode_tokens<I>(tokens: I, dictionary: &Dictionary, sequence: &mut Vec<Symbol>) -> usize
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    sequence.clear();
    let mut seen = 0usize;
    for token in tokens {
        seen += 1;
        if let Some(code) = dictionary.lookup(token.as_ref()) {
            sequence.push(code);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dictionary() -> Dictionary {
        Dictionary::from_reader(Cursor::new("5\tthe\n3\tof\n1\tcat\n"), 1000).unwrap()
    }

    #[test]
    fn test_unknown_tokens_dropped() {
        let dict = dictionary();
        let mut seq = Vec::new();
        let seen = encode_tokens(["the", "xyz", "of"], &dict, &mut seq);
        assert_eq!(seq, vec![0, 1]);
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_no_known_tokens() {
        let dict = dictionary();
        let mut seq = vec![7, 7, 7];
        let seen = encode_tokens(["dog", "bird"], &dict, &mut seq);
        assert!(seq.is_empty());
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_buffer_reused_across_documents() {
        let dict = dictionary();
        let mut seq = Vec::with_capacity(64);
        encode_tokens(["cat", "cat", "the"], &dict, &mut seq);
        assert_eq!(seq, vec![2, 2, 0]);
        let capacity = seq.capacity();

        encode_tokens(vec!["of".to_string()], &dict, &mut seq);
        assert_eq!(seq, vec![1]);
        assert_eq!(seq.capacity(), capacity);
    }
}
