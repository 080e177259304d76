//! Simple-9: pack as many small integers as fit in a 28-bit payload
//!
//! Each word is a 4-bit selector (high bits) plus 28 data bits split into
//! equal slots. A header word records the integer count so a partly filled
//! final word is unambiguous. Integers of 2^28 or more cannot be encoded.

use super::{IntegerCodec, Progress, length_word};
use crate::error::{Error, Result};

const NAME: &str = "simple9";

/// (integers per word, bits per integer), densest first
const SELECTORS: [(usize, u8); 9] = [
    (28, 1),
    (14, 2),
    (9, 3),
    (7, 4),
    (5, 5),
    (4, 7),
    (3, 9),
    (2, 14),
    (1, 28),
];

const MAX_VALUE: u32 = (1 << 28) - 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct Simple9;

impl IntegerCodec for Simple9 {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let capacity = output.len();
        let mut written = 0usize;
        let mut emit = |word: u32| -> Result<()> {
            let slot = output
                .get_mut(written)
                .ok_or(Error::OutputCapacity { codec: NAME, capacity })?;
            *slot = word;
            written += 1;
            Ok(())
        };

        emit(length_word(NAME, input.len())?)?;

        let mut pos = 0usize;
        while pos < input.len() {
            let rest = &input[pos..];
            let (selector, take, bits) = SELECTORS
                .iter()
                .enumerate()
                .map(|(sel, &(count, bits))| (sel, count.min(rest.len()), bits))
                .find(|&(_, take, bits)| rest[..take].iter().all(|&v| v >> bits == 0))
                .ok_or(Error::UnencodableValue {
                    codec: NAME,
                    value: rest[0],
                })?;

            let mut word = (selector as u32) << 28;
            for (slot, &value) in rest[..take].iter().enumerate() {
                word |= value << (slot as u32 * bits as u32);
            }
            emit(word)?;
            pos += take;
        }

        Ok(Progress::new(input.len(), written))
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let (&header, words) = input
            .split_first()
            .ok_or_else(|| Error::Corrupt(format!("{NAME}: missing header")))?;
        let n = header as usize;
        if n > output.len() {
            return Err(Error::OutputCapacity {
                codec: NAME,
                capacity: output.len(),
            });
        }

        let mut pos = 0usize;
        let mut consumed = 1usize;
        for &word in words {
            if pos == n {
                break;
            }
            let selector = (word >> 28) as usize;
            let &(count, bits) = SELECTORS
                .get(selector)
                .ok_or_else(|| Error::Corrupt(format!("{NAME}: selector {selector}")))?;
            let mask = (1u32 << bits) - 1;
            let take = count.min(n - pos);
            for slot in 0..take {
                output[pos + slot] = (word >> (slot as u32 * bits as u32)) & mask;
            }
            pos += take;
            consumed += 1;
        }

        if pos < n {
            return Err(Error::Corrupt(format!("{NAME}: stream truncated")));
        }
        Ok(Progress::new(consumed, n))
    }
}
