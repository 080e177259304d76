//! Variable byte coding packed into 32-bit words
//!
//! Each integer is split into 7-bit groups, least significant first. The
//! last byte of an integer carries the stop bit (0x80), so the zero bytes
//! padding the final word decode to nothing and no length header is needed.

use super::{IntegerCodec, Progress};
use crate::error::{Error, Result};

const NAME: &str = "vbyte";

#[derive(Debug, Clone, Copy, Default)]
pub struct VariableByte;

/// Byte cursor over little-endian packed words
struct ByteSink<'a> {
    out: &'a mut [u32],
    bytes: usize,
}

impl ByteSink<'_> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<()> {
        let word = self.bytes / 4;
        let shift = (self.bytes % 4) * 8;
        let capacity = self.out.len();
        let slot = self.out.get_mut(word).ok_or(Error::OutputCapacity {
            codec: NAME,
            capacity,
        })?;
        if shift == 0 {
            *slot = 0;
        }
        *slot |= (byte as u32) << shift;
        self.bytes += 1;
        Ok(())
    }

    fn words(&self) -> usize {
        self.bytes.div_ceil(4)
    }
}

impl IntegerCodec for VariableByte {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let mut sink = ByteSink {
            out: output,
            bytes: 0,
        };
        for &value in input {
            let mut v = value;
            while v >= 0x80 {
                sink.put((v & 0x7F) as u8)?;
                v >>= 7;
            }
            sink.put(v as u8 | 0x80)?;
        }
        Ok(Progress::new(input.len(), sink.words()))
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let capacity = output.len();
        let mut written = 0usize;
        let mut value = 0u32;
        let mut shift = 0u32;

        for byte in input.iter().flat_map(|w| w.to_le_bytes()) {
            if shift > 28 {
                return Err(Error::Corrupt(format!("{NAME}: integer longer than 5 bytes")));
            }
            value |= ((byte & 0x7F) as u32) << shift;
            if byte & 0x80 != 0 {
                let slot = output
                    .get_mut(written)
                    .ok_or(Error::OutputCapacity { codec: NAME, capacity })?;
                *slot = value;
                written += 1;
                value = 0;
                shift = 0;
            } else {
                shift += 7;
            }
        }

        if value != 0 {
            return Err(Error::Corrupt(format!("{NAME}: stream ends mid-integer")));
        }
        Ok(Progress::new(input.len(), written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_lengths() {
        let cases: [(u32, usize); 6] = [
            (0, 1),
            (127, 1),
            (128, 2),
            (16_383, 2),
            (16_384, 3),
            (u32::MAX, 5),
        ];
        for (value, bytes) in cases {
            let mut out = [0u32; 2];
            let progress = VariableByte.compress(&[value], &mut out).unwrap();
            assert_eq!(progress.written, bytes.div_ceil(4), "value {}", value);
        }
    }

    #[test]
    fn test_padding_is_ignored() {
        let input = [1u32, 300, 0];
        let mut out = [0xFFFF_FFFFu32; 4];
        let progress = VariableByte.compress(&input, &mut out).unwrap();
        // 1 + 2 + 1 bytes -> one word
        assert_eq!(progress.written, 1);

        let mut decoded = [0u32; 8];
        let back = VariableByte
            .uncompress(&out[..progress.written], &mut decoded)
            .unwrap();
        assert_eq!(back.written, 3);
        assert_eq!(&decoded[..3], &input);
    }

    #[test]
    fn test_five_byte_values() {
        let input = [u32::MAX, 1 << 31, 0x0FFF_FFFF];
        let mut out = [0u32; 8];
        let progress = VariableByte.compress(&input, &mut out).unwrap();
        let mut decoded = [0u32; 3];
        VariableByte
            .uncompress(&out[..progress.written], &mut decoded)
            .unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_truncated_stream() {
        // 0x7F without stop bit
        assert!(matches!(
            VariableByte.uncompress(&[0x0000_007F], &mut [0u32; 4]),
            Err(Error::Corrupt(_))
        ));
    }
}
