//! Bits-per-integer measurement for one codec over one sequence

use crate::Symbol;
use crate::codec::IntegerCodec;
use crate::error::{Error, Result};

/// Extra output words beyond the input length given to every codec call
pub const DEFAULT_OUTPUT_SLACK: usize = 1024;

/// Width of the unit every codec emits
pub const BITS_PER_WORD: f64 = 32.0;

/// Reusable codec output buffer.
///
/// Grows to `input_len + slack` words on demand and never shrinks, so a
/// whole run allocates only as much as its longest document needs.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    words: Vec<u32>,
    slack: usize,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_SLACK)
    }
}

impl OutputBuffer {
    pub fn new(slack: usize) -> Self {
        Self {
            words: Vec::new(),
            slack,
        }
    }

    pub fn slack(&self) -> usize {
        self.slack
    }

    /// Current allocation in words
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Output slice sized for an input of `input_len` integers
    pub fn prepare(&mut self, input_len: usize) -> &mut [u32] {
        let needed = input_len + self.slack;
        if self.words.len() < needed {
            self.words.resize(needed, 0);
        }
        &mut self.words[..needed]
    }

    /// Words produced by the last compression
    pub fn as_slice(&self) -> &[u32] {
        &self.words
    }
}

/// Compress `sequence` and return the number of words written.
///
/// Fails with [`Error::ContractViolation`] if the codec leaves part of the
/// input unconsumed. Returns 0 for an empty sequence without calling the
/// codec.
pub fn compressed_words(
    sequence: &[Symbol],
    codec: &dyn IntegerCodec,
    buffer: &mut OutputBuffer,
) -> Result<usize> {
    if sequence.is_empty() {
        return Ok(0);
    }
    let output = buffer.prepare(sequence.len());
    let progress = codec.compress(sequence, output)?;
    if progress.consumed != sequence.len() {
        return Err(Error::ContractViolation {
            codec: codec.name(),
            consumed: progress.consumed,
            supplied: sequence.len(),
        });
    }
    Ok(progress.written)
}

/// `words * 32 / integers`, 0 when there are no integers
#[inline]
pub fn ratio(words: usize, integers: usize) -> f64 {
    if integers == 0 {
        0.0
    } else {
        words as f64 * BITS_PER_WORD / integers as f64
    }
}

/// Bits per integer achieved by `codec` on `sequence`
pub fn bits_per_integer(
    sequence: &[Symbol],
    codec: &dyn IntegerCodec,
    buffer: &mut OutputBuffer,
) -> Result<f64> {
    let words = compressed_words(sequence, codec, buffer)?;
    Ok(ratio(words, sequence.len()))
}

/// Compress, decompress and compare against the original.
///
/// `scratch` holds the decoded integers and is reused across calls.
pub fn verify_round_trip(
    sequence: &[Symbol],
    codec: &dyn IntegerCodec,
    buffer: &mut OutputBuffer,
    scratch: &mut Vec<u32>,
) -> Result<()> {
    let words = compressed_words(sequence, codec, buffer)?;
    if sequence.is_empty() {
        return Ok(());
    }

    let needed = sequence.len() + buffer.slack();
    if scratch.len() < needed {
        scratch.resize(needed, 0);
    }
    let decoded = codec.uncompress(&buffer.as_slice()[..words], &mut scratch[..needed])?;

    let mismatch = sequence
        .iter()
        .zip(&scratch[..decoded.written.min(sequence.len())])
        .position(|(a, b)| a != b);
    match mismatch {
        Some(position) => Err(Error::RoundTrip {
            codec: codec.name(),
            position,
        }),
        None if decoded.written != sequence.len() => Err(Error::RoundTrip {
            codec: codec.name(),
            position: decoded.written.min(sequence.len()),
        }),
        None => Ok(()),
    }
}
