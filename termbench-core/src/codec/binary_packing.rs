//! Binary packing: fixed bit width per 32-integer mini block
//!
//! Format:
//! - Header word: number of integers encoded (a multiple of 128)
//! - Per 128 integers: one word holding the four mini-block bit widths
//!   (8 bits each, first mini block in the high byte), then the four mini
//!   blocks packed at their widths
//!
//! Only whole 128-integer groups are consumed; pair with a tail codec.

use super::bits::{BitReader, BitWriter, bits_needed};
use super::{IntegerCodec, Progress, length_word};
use crate::error::{Error, Result};

/// Integers per group
pub const BLOCK_SIZE: usize = 128;

/// Integers per mini block (one bit width each)
const MINI_BLOCK_SIZE: usize = 32;

const NAME: &str = "binarypacking";

#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryPacking;

impl IntegerCodec for BinaryPacking {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let n = input.len() / BLOCK_SIZE * BLOCK_SIZE;
        let mut writer = BitWriter::new(NAME, output);
        writer.write(length_word(NAME, n)?, 32)?;

        for group in input[..n].chunks_exact(BLOCK_SIZE) {
            let mut widths = [0u8; 4];
            for (width, mini) in widths.iter_mut().zip(group.chunks_exact(MINI_BLOCK_SIZE)) {
                let max = mini.iter().copied().max().unwrap_or(0);
                *width = bits_needed(max);
            }
            writer.write(u32::from_be_bytes(widths), 32)?;

            for (&width, mini) in widths.iter().zip(group.chunks_exact(MINI_BLOCK_SIZE)) {
                for &value in mini {
                    writer.write(value, width)?;
                }
            }
        }

        Ok(Progress::new(n, writer.finish()?))
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let mut reader = BitReader::new(input);
        let n = reader.read(32)? as usize;
        if n % BLOCK_SIZE != 0 {
            return Err(Error::Corrupt(format!(
                "{NAME}: length {n} is not a multiple of {BLOCK_SIZE}"
            )));
        }
        if n > output.len() {
            return Err(Error::OutputCapacity {
                codec: NAME,
                capacity: output.len(),
            });
        }

        for group in output[..n].chunks_exact_mut(BLOCK_SIZE) {
            let widths = reader.read(32)?.to_be_bytes();
            for (&width, mini) in widths.iter().zip(group.chunks_exact_mut(MINI_BLOCK_SIZE)) {
                if width > 32 {
                    return Err(Error::Corrupt(format!("{NAME}: bit width {width}")));
                }
                for slot in mini.iter_mut() {
                    *slot = reader.read(width)?;
                }
            }
        }

        Ok(Progress::new(reader.words_consumed(), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_whole_groups_consumed() {
        let input = vec![1u32; 300];
        let mut out = vec![0u32; 512];
        let progress = BinaryPacking.compress(&input, &mut out).unwrap();
        assert_eq!(progress.consumed, 256);
        // header + 2 * (widths word + 4 * 32 one-bit values)
        assert_eq!(progress.written, 1 + 2 * (1 + 4));
    }

    #[test]
    fn test_short_input_writes_header_only() {
        let mut out = [0u32; 4];
        let progress = BinaryPacking.compress(&[5, 6, 7], &mut out).unwrap();
        assert_eq!(progress, Progress::new(0, 1));
        assert_eq!(out[0], 0);
    }

    #[test]
    fn test_widths_per_mini_block() {
        let mut input = vec![0u32; 128];
        input[40] = 255;
        input[127] = 1 << 20;
        let mut out = vec![0u32; 256];
        let progress = BinaryPacking.compress(&input, &mut out).unwrap();
        assert_eq!(out[1].to_be_bytes(), [0, 8, 0, 21]);
        // header + widths + (8 + 21) * 32 bits / 32
        assert_eq!(progress.written, 2 + 8 + 21);

        let mut decoded = vec![0u32; 128];
        let back = BinaryPacking
            .uncompress(&out[..progress.written], &mut decoded)
            .unwrap();
        assert_eq!(back, Progress::new(progress.written, 128));
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_capacity_error() {
        let input: Vec<u32> = (0..128).map(|i| i * 1000).collect();
        let mut out = vec![0u32; 8];
        let err = BinaryPacking.compress(&input, &mut out).unwrap_err();
        assert!(matches!(err, Error::OutputCapacity { codec: NAME, .. }));
    }
}
