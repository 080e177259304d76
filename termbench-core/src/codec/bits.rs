//! Bit-level reader/writer over 32-bit words
//!
//! All codecs emit fixed-width `u32` words. Values are packed little-endian:
//! the first value occupies the lowest bits of the first word, and a value
//! may straddle two words.

use crate::error::{Error, Result};

/// Compute the number of bits needed to represent the maximum value
#[inline]
pub fn bits_needed(max_val: u32) -> u8 {
    if max_val == 0 {
        0
    } else {
        32 - max_val.leading_zeros() as u8
    }
}

/// Low `width` bits set (width 0..=32)
#[inline]
pub fn low_mask(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Appends bit fields to a word slice, failing instead of overrunning it
pub struct BitWriter<'a> {
    codec: &'static str,
    out: &'a mut [u32],
    pos: usize,
    acc: u64,
    filled: u32,
}

impl<'a> BitWriter<'a> {
    pub fn new(codec: &'static str, out: &'a mut [u32]) -> Self {
        Self {
            codec,
            out,
            pos: 0,
            acc: 0,
            filled: 0,
        }
    }

    /// Write the low `width` bits of `value`
    #[inline]
    pub fn write(&mut self, value: u32, width: u8) -> Result<()> {
        if width == 0 {
            return Ok(());
        }
        self.acc |= ((value & low_mask(width)) as u64) << self.filled;
        self.filled += width as u32;
        if self.filled >= 32 {
            self.push(self.acc as u32)?;
            self.acc >>= 32;
            self.filled -= 32;
        }
        Ok(())
    }

    #[inline]
    fn push(&mut self, word: u32) -> Result<()> {
        let capacity = self.out.len();
        let slot = self.out.get_mut(self.pos).ok_or(Error::OutputCapacity {
            codec: self.codec,
            capacity,
        })?;
        *slot = word;
        self.pos += 1;
        Ok(())
    }

    /// Flush the partial word (zero padded) and return the words written
    pub fn finish(mut self) -> Result<usize> {
        if self.filled > 0 {
            self.push(self.acc as u32)?;
        }
        Ok(self.pos)
    }
}

/// Reads bit fields back from a word slice
pub struct BitReader<'a> {
    input: &'a [u32],
    pos: usize,
    acc: u64,
    available: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(input: &'a [u32]) -> Self {
        Self {
            input,
            pos: 0,
            acc: 0,
            available: 0,
        }
    }

    #[inline]
    pub fn read(&mut self, width: u8) -> Result<u32> {
        if width == 0 {
            return Ok(0);
        }
        while self.available < width as u32 {
            let word = *self
                .input
                .get(self.pos)
                .ok_or_else(|| Error::Corrupt("bit stream truncated".to_string()))?;
            self.acc |= (word as u64) << self.available;
            self.pos += 1;
            self.available += 32;
        }
        let value = (self.acc as u32) & low_mask(width);
        self.acc >>= width;
        self.available -= width as u32;
        Ok(value)
    }

    /// Words touched so far, counting a partially read word as consumed
    pub fn words_consumed(&self) -> usize {
        self.pos
    }
}
