//! Patched frame-of-reference block codecs (NewPFD and OptPFD)
//!
//! Following "Decoding billions of integers per second through
//! vectorization":
//! - The low `b` bits of ALL values go to the main array
//! - Values >= 2^b are exceptions: only their HIGH bits are stored, together
//!   with their positions in the block
//! - Decoding reconstructs `value = (high_bits << b) | low_bits`
//!
//! The two codecs share the block format and differ in how `b` and the
//! exception layout are chosen:
//! - NewPFD takes the smallest `b` that keeps exceptions under 10% of the
//!   block, stores `32 - b` high bits and a 7-bit position per exception
//! - OptPFD tries every `b` and keeps the cheapest encoding, storing only
//!   as many high bits as the largest exception needs, with positions as a
//!   list when exceptions are sparse or a 128-bit bitmap when they are dense
//!
//! Stream format:
//! - Header word: number of integers encoded (a multiple of 128)
//! - Per block: descriptor word
//!   `bit_width (8) | exceptions (8) | bitmap flag (1) | pad (1) | high_width (6)`,
//!   then 128 values at `bit_width` bits, then exception positions, then
//!   exception high bits at `high_width` bits. Blocks are not word aligned.

use super::bits::{BitReader, BitWriter, bits_needed, low_mask};
use super::{IntegerCodec, Progress, length_word};
use crate::error::{Error, Result};

/// Block size for PFD codecs (128 integers)
pub const PFD_BLOCK_SIZE: usize = 128;

/// Maximum share of exceptions NewPFD accepts in a block
const MAX_EXCEPTIONS_RATIO: f32 = 0.10;

/// Bits to store one exception position as a list entry
const POSITION_BITS: u8 = 7;

/// How one block is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockLayout {
    bit_width: u8,
    exceptions: usize,
    bitmap: bool,
    high_width: u8,
}

impl BlockLayout {
    fn descriptor(&self) -> u32 {
        self.bit_width as u32
            | (self.exceptions as u32) << 8
            | (self.bitmap as u32) << 16
            | (self.high_width as u32) << 18
    }

    fn from_descriptor(codec: &'static str, word: u32) -> Result<Self> {
        let layout = Self {
            bit_width: (word & 0xFF) as u8,
            exceptions: ((word >> 8) & 0xFF) as usize,
            bitmap: (word >> 16) & 1 == 1,
            high_width: ((word >> 18) & 0x3F) as u8,
        };
        let valid = layout.bit_width <= 32
            && layout.exceptions <= PFD_BLOCK_SIZE
            && layout.high_width <= 32
            && (layout.exceptions == 0 || layout.bit_width < 32);
        if !valid {
            return Err(Error::Corrupt(format!(
                "{codec}: bad block descriptor {word:#010x}"
            )));
        }
        Ok(layout)
    }
}

/// Histogram of bit widths: `counts[b]` = values needing exactly b bits
fn width_histogram(values: &[u32]) -> [usize; 33] {
    let mut counts = [0usize; 33];
    for &v in values {
        counts[bits_needed(v) as usize] += 1;
    }
    counts
}

/// Number of values needing more than `b` bits, for every b
fn exceptions_by_width(counts: &[usize; 33]) -> [usize; 33] {
    let mut above = [0usize; 33];
    for b in (0..32).rev() {
        above[b] = above[b + 1] + counts[b + 1];
    }
    above
}

/// Smallest width keeping exceptions under the NewPFD ratio
fn newpfd_layout(values: &[u32]) -> BlockLayout {
    let max_exceptions = ((values.len() as f32) * MAX_EXCEPTIONS_RATIO).ceil() as usize;
    let above = exceptions_by_width(&width_histogram(values));

    let bit_width = (0..=32u8)
        .find(|&b| above[b as usize] <= max_exceptions)
        .unwrap_or(32);
    let exceptions = above[bit_width as usize];
    BlockLayout {
        bit_width,
        exceptions,
        bitmap: false,
        high_width: if exceptions > 0 { 32 - bit_width } else { 0 },
    }
}

/// Cheapest (bit_width, position layout) over all widths
fn optpfd_layout(values: &[u32]) -> BlockLayout {
    let n = values.len();
    let counts = width_histogram(values);
    let above = exceptions_by_width(&counts);
    let max_bits = (0..=32u8).rev().find(|&b| counts[b as usize] > 0).unwrap_or(0);

    let mut best: Option<(usize, BlockLayout)> = None;
    for b in 0..=max_bits {
        let exceptions = above[b as usize];
        let high_width = max_bits - b;
        let list_bits = exceptions * POSITION_BITS as usize;
        let bitmap = exceptions > 0 && PFD_BLOCK_SIZE < list_bits;
        let position_bits = if bitmap { PFD_BLOCK_SIZE } else { list_bits };
        let total = n * b as usize + position_bits + exceptions * high_width as usize;

        if best.is_none_or(|(cost, _)| total < cost) {
            best = Some((
                total,
                BlockLayout {
                    bit_width: b,
                    exceptions,
                    bitmap,
                    high_width: if exceptions > 0 { high_width } else { 0 },
                },
            ));
        }
    }
    best.map(|(_, layout)| layout).unwrap_or(BlockLayout {
        bit_width: 0,
        exceptions: 0,
        bitmap: false,
        high_width: 0,
    })
}

fn encode_block(block: &[u32], layout: BlockLayout, writer: &mut BitWriter<'_>) -> Result<()> {
    let b = layout.bit_width;
    writer.write(layout.descriptor(), 32)?;
    for &value in block {
        writer.write(value, b)?;
    }
    if layout.exceptions == 0 {
        return Ok(());
    }

    let is_exception = |v: u32| b < 32 && v > low_mask(b);
    if layout.bitmap {
        for &value in block {
            writer.write(is_exception(value) as u32, 1)?;
        }
    } else {
        for (pos, &value) in block.iter().enumerate() {
            if is_exception(value) {
                writer.write(pos as u32, POSITION_BITS)?;
            }
        }
    }
    for &value in block.iter().filter(|&&v| is_exception(v)) {
        writer.write(value >> b, layout.high_width)?;
    }
    Ok(())
}

fn decode_block(
    codec: &'static str,
    reader: &mut BitReader<'_>,
    block: &mut [u32],
) -> Result<()> {
    let layout = BlockLayout::from_descriptor(codec, reader.read(32)?)?;
    let b = layout.bit_width;
    for slot in block.iter_mut() {
        *slot = reader.read(b)?;
    }
    if layout.exceptions == 0 {
        return Ok(());
    }

    let mut positions = [0u8; PFD_BLOCK_SIZE];
    let mut found = 0usize;
    if layout.bitmap {
        for pos in 0..PFD_BLOCK_SIZE {
            if reader.read(1)? == 1 {
                if found == layout.exceptions {
                    return Err(Error::Corrupt(format!("{codec}: exception bitmap overflow")));
                }
                positions[found] = pos as u8;
                found += 1;
            }
        }
        if found != layout.exceptions {
            return Err(Error::Corrupt(format!("{codec}: exception bitmap underflow")));
        }
    } else {
        for position in positions.iter_mut().take(layout.exceptions) {
            *position = reader.read(POSITION_BITS)? as u8;
        }
    }

    for &pos in &positions[..layout.exceptions] {
        let high = reader.read(layout.high_width)?;
        let slot = block
            .get_mut(pos as usize)
            .ok_or_else(|| Error::Corrupt(format!("{codec}: exception position {pos}")))?;
        *slot |= high << b;
    }
    Ok(())
}

fn compress_blocks(
    codec: &'static str,
    choose: fn(&[u32]) -> BlockLayout,
    input: &[u32],
    output: &mut [u32],
) -> Result<Progress> {
    let n = input.len() / PFD_BLOCK_SIZE * PFD_BLOCK_SIZE;
    let mut writer = BitWriter::new(codec, output);
    writer.write(length_word(codec, n)?, 32)?;
    for block in input[..n].chunks_exact(PFD_BLOCK_SIZE) {
        encode_block(block, choose(block), &mut writer)?;
    }
    Ok(Progress::new(n, writer.finish()?))
}

fn uncompress_blocks(codec: &'static str, input: &[u32], output: &mut [u32]) -> Result<Progress> {
    let mut reader = BitReader::new(input);
    let n = reader.read(32)? as usize;
    if n % PFD_BLOCK_SIZE != 0 {
        return Err(Error::Corrupt(format!(
            "{codec}: length {n} is not a multiple of {PFD_BLOCK_SIZE}"
        )));
    }
    if n > output.len() {
        return Err(Error::OutputCapacity {
            codec,
            capacity: output.len(),
        });
    }
    for block in output[..n].chunks_exact_mut(PFD_BLOCK_SIZE) {
        decode_block(codec, &mut reader, block)?;
    }
    Ok(Progress::new(reader.words_consumed(), n))
}

/// NewPFD block codec (whole 128-integer blocks only)
#[derive(Debug, Clone, Copy, Default)]
pub struct NewPfd;

impl IntegerCodec for NewPfd {
    fn name(&self) -> &'static str {
        "newpfd"
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        compress_blocks(self.name(), newpfd_layout, input, output)
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        uncompress_blocks(self.name(), input, output)
    }
}

/// OptPFD block codec (whole 128-integer blocks only)
#[derive(Debug, Clone, Copy, Default)]
pub struct OptPfd;

impl IntegerCodec for OptPfd {
    fn name(&self) -> &'static str {
        "optpfd"
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        compress_blocks(self.name(), optpfd_layout, input, output)
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        uncompress_blocks(self.name(), input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with_outliers(outliers: &[(usize, u32)]) -> Vec<u32> {
        let mut values: Vec<u32> = (0..PFD_BLOCK_SIZE as u32).map(|i| i % 16).collect();
        for &(pos, v) in outliers {
            values[pos] = v;
        }
        values
    }

    #[test]
    fn test_all_zero_block() {
        let values = vec![0u32; PFD_BLOCK_SIZE];
        let layout = optpfd_layout(&values);
        assert_eq!(layout.bit_width, 0);
        assert_eq!(layout.exceptions, 0);
        assert_eq!(newpfd_layout(&values).bit_width, 0);
    }

    #[test]
    fn test_outlier_becomes_exception() {
        let values = block_with_outliers(&[(50, 1_000_000)]);

        let opt = optpfd_layout(&values);
        assert_eq!(opt.bit_width, 4);
        assert_eq!(opt.exceptions, 1);
        assert!(!opt.bitmap);
        assert_eq!(opt.high_width, 20 - 4);

        let new = newpfd_layout(&values);
        assert_eq!(new.bit_width, 4);
        assert_eq!(new.exceptions, 1);
        assert_eq!(new.high_width, 28);
    }

    #[test]
    fn test_newpfd_caps_exception_ratio() {
        // 20 outliers (> 10% of 128) force a wider NewPFD block
        let outliers: Vec<(usize, u32)> = (0..20).map(|i| (i * 6, 5000)).collect();
        let values = block_with_outliers(&outliers);
        let layout = newpfd_layout(&values);
        assert_eq!(layout.exceptions, 0);
        assert_eq!(layout.bit_width, bits_needed(5000));
    }

    #[test]
    fn test_optpfd_uses_bitmap_for_dense_exceptions() {
        // every other value is large: a position list would cost 64 * 7 bits
        let values: Vec<u32> = (0..PFD_BLOCK_SIZE as u32)
            .map(|i| if i % 2 == 0 { 1 } else { 1 << 12 | i })
            .collect();
        let layout = optpfd_layout(&values);
        if layout.exceptions > 0 {
            assert_eq!(layout.bitmap, layout.exceptions * 7 > PFD_BLOCK_SIZE);
        }

        let mut packed = vec![0u32; 512];
        let progress = OptPfd.compress(&values, &mut packed).unwrap();
        let mut decoded = vec![0u32; PFD_BLOCK_SIZE];
        OptPfd
            .uncompress(&packed[..progress.written], &mut decoded)
            .unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_bitmap_layout_round_trip() {
        let values = block_with_outliers(&[(0, 900), (1, 901), (2, 902), (40, 77_000), (127, 5)]);
        let layout = BlockLayout {
            bit_width: 4,
            exceptions: 4,
            bitmap: true,
            high_width: 13,
        };
        let mut words = vec![0u32; 256];
        let mut writer = BitWriter::new("optpfd", &mut words);
        encode_block(&values, layout, &mut writer).unwrap();
        let written = writer.finish().unwrap();

        let mut reader = BitReader::new(&words[..written]);
        let mut decoded = vec![0u32; PFD_BLOCK_SIZE];
        decode_block("optpfd", &mut reader, &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_optpfd_never_larger_than_newpfd() {
        let values = block_with_outliers(&[(3, 70_000), (9, 123), (77, 1 << 19)]);
        let mut a = vec![0u32; 512];
        let mut b = vec![0u32; 512];
        let opt = OptPfd.compress(&values, &mut a).unwrap();
        let new = NewPfd.compress(&values, &mut b).unwrap();
        assert!(opt.written <= new.written);
    }

    #[test]
    fn test_corrupt_descriptor() {
        // header says one block, descriptor claims 40-bit values
        let words = [128u32, 40];
        let mut out = vec![0u32; PFD_BLOCK_SIZE];
        assert!(matches!(
            NewPfd.uncompress(&words, &mut out),
            Err(Error::Corrupt(_))
        ));
    }
}
