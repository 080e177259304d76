//! Integer codecs compared by the benchmark
//!
//! Every codec works on `u32` words in both directions: it reads 32-bit
//! integers and emits 32-bit words, so any sub-word packing shows up only as
//! fewer output words. The roster is closed:
//!
//! | Name            | Kind                                                   |
//! |-----------------|--------------------------------------------------------|
//! | `binarypacking` | 128-int blocks, one bit width per 32 ints, vbyte tail   |
//! | `newpfd`        | patched blocks, exceptions capped at 10%, vbyte tail    |
//! | `optpfd`        | patched blocks, size-optimal width, vbyte tail          |
//! | `simple9`       | 9 selectors over 28-bit payloads                        |
//! | `vbyte`         | 7 bits per byte, stop bit on the last byte              |
//! | `copy`          | identity control (always 32 bits/int)                   |

mod binary_packing;
pub mod bits;
mod composition;
mod copy;
mod pfd;
mod simple9;
mod variable_byte;

use std::fmt;

pub use binary_packing::BinaryPacking;
pub use composition::Composition;
pub use copy::JustCopy;
pub use pfd::{NewPfd, OptPfd, PFD_BLOCK_SIZE};
pub use simple9::Simple9;
pub use variable_byte::VariableByte;

use crate::error::{Error, Result};

/// How much of each buffer a codec call used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Integers (compress) or words (uncompress) read from the input
    pub consumed: usize,
    /// Words (compress) or integers (uncompress) written to the output
    pub written: usize,
}

impl Progress {
    pub fn new(consumed: usize, written: usize) -> Self {
        Self { consumed, written }
    }
}

/// A stateless integer-sequence codec.
///
/// Offsets are expressed by subslicing: a call reads from the start of
/// `input` and writes from the start of `output`. Running out of `output`
/// is an [`Error::OutputCapacity`], never a silent truncation.
pub trait IntegerCodec {
    fn name(&self) -> &'static str;

    /// Compress `input` into `output`
    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress>;

    /// Decode a stream produced by [`IntegerCodec::compress`]
    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress>;
}

impl<C: IntegerCodec + ?Sized> IntegerCodec for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        (**self).compress(input, output)
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        (**self).uncompress(input, output)
    }
}

/// Codec roster entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    BinaryPacking,
    NewPfd,
    OptPfd,
    Simple9,
    VariableByte,
    Copy,
}

impl CodecKind {
    /// Default roster, in report order
    pub const ALL: [CodecKind; 6] = [
        CodecKind::BinaryPacking,
        CodecKind::NewPfd,
        CodecKind::OptPfd,
        CodecKind::Simple9,
        CodecKind::VariableByte,
        CodecKind::Copy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CodecKind::BinaryPacking => "binarypacking",
            CodecKind::NewPfd => "newpfd",
            CodecKind::OptPfd => "optpfd",
            CodecKind::Simple9 => "simple9",
            CodecKind::VariableByte => "vbyte",
            CodecKind::Copy => "copy",
        }
    }

    /// Parse a codec name (case-insensitive, a few aliases accepted)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binarypacking" | "bp" => Some(CodecKind::BinaryPacking),
            "newpfd" | "pfor" => Some(CodecKind::NewPfd),
            "optpfd" => Some(CodecKind::OptPfd),
            "simple9" | "s9" => Some(CodecKind::Simple9),
            "vbyte" | "variablebyte" => Some(CodecKind::VariableByte),
            "copy" | "identity" | "justcopy" => Some(CodecKind::Copy),
            _ => None,
        }
    }

    /// Parse a comma-separated roster such as `"bp,simple9,copy"`
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        let mut roster = Vec::new();
        for name in s.split(',').filter(|n| !n.trim().is_empty()) {
            let kind = Self::parse(name)
                .ok_or_else(|| Error::Config(format!("unknown codec '{}'", name.trim())))?;
            if roster.contains(&kind) {
                return Err(Error::Config(format!("codec '{}' listed twice", kind)));
            }
            roster.push(kind);
        }
        if roster.is_empty() {
            return Err(Error::Config("codec roster is empty".to_string()));
        }
        Ok(roster)
    }

    /// Instantiate the codec
    pub fn build(self) -> Box<dyn IntegerCodec> {
        match self {
            CodecKind::BinaryPacking => Box::new(Composition::new(
                self.name(),
                BinaryPacking,
                VariableByte,
            )),
            CodecKind::NewPfd => Box::new(Composition::new(self.name(), NewPfd, VariableByte)),
            CodecKind::OptPfd => Box::new(Composition::new(self.name(), OptPfd, VariableByte)),
            CodecKind::Simple9 => Box::new(Simple9),
            CodecKind::VariableByte => Box::new(VariableByte),
            CodecKind::Copy => Box::new(JustCopy),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store a sequence length in one header word
pub(crate) fn length_word(codec: &'static str, n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::Config(format!("{codec}: sequence of {n} integers too long")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Zipf-ish term codes: mostly small, occasionally large
    fn term_codes(n: usize, seed: u64) -> Vec<u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let r: f64 = rng.gen_range(0.0..1.0);
                ((1.0 / (1.0 - r * 0.999_999)).powf(1.2) as u32).min(999_999)
            })
            .collect()
    }

    fn round_trip(kind: CodecKind, input: &[u32]) {
        let codec = kind.build();
        let mut compressed = vec![0u32; input.len() * 2 + 1024];
        let enc = codec.compress(input, &mut compressed).unwrap();
        assert_eq!(enc.consumed, input.len(), "{kind} consumed");

        let mut decoded = vec![0u32; input.len() + 1024];
        let dec = codec.uncompress(&compressed[..enc.written], &mut decoded).unwrap();
        assert_eq!(dec.written, input.len(), "{kind} decoded length");
        assert_eq!(dec.consumed, enc.written, "{kind} words consumed");
        assert_eq!(&decoded[..input.len()], input, "{kind} values");
    }

    #[test]
    fn test_every_codec_round_trips_term_codes() {
        // lengths around the 128-int block boundary exercise the vbyte tail
        for &n in &[1usize, 5, 127, 128, 129, 300, 1000] {
            let input = term_codes(n, n as u64);
            for kind in CodecKind::ALL {
                round_trip(kind, &input);
            }
        }
    }

    #[test]
    fn test_every_codec_round_trips_edge_values() {
        let mut input = vec![0u32; 256];
        input[3] = (1 << 28) - 1;
        input[200] = 1;
        input.extend([7u32; 40]);
        for kind in CodecKind::ALL {
            round_trip(kind, &input);
        }
    }

    #[test]
    fn test_parse_names_and_aliases() {
        for kind in CodecKind::ALL {
            assert_eq!(CodecKind::parse(kind.name()), Some(kind));
            assert_eq!(kind.build().name(), kind.name());
        }
        assert_eq!(CodecKind::parse("BP"), Some(CodecKind::BinaryPacking));
        assert_eq!(CodecKind::parse("identity"), Some(CodecKind::Copy));
        assert_eq!(CodecKind::parse("lz4"), None);
    }

    #[test]
    fn test_parse_list() {
        let roster = CodecKind::parse_list("simple9, copy").unwrap();
        assert_eq!(roster, vec![CodecKind::Simple9, CodecKind::Copy]);

        assert!(matches!(CodecKind::parse_list("copy,zstd"), Err(Error::Config(_))));
        assert!(matches!(CodecKind::parse_list("copy,identity"), Err(Error::Config(_))));
        assert!(matches!(CodecKind::parse_list(" , "), Err(Error::Config(_))));
    }
}
