//! Chain a block codec with a tail codec

use super::{IntegerCodec, Progress};
use crate::error::Result;

/// Runs `head` over the input, then `tail` over whatever `head` left.
///
/// Block codecs only consume whole blocks, so pairing one with a codec that
/// takes any length yields a codec that consumes everything.
#[derive(Debug, Clone)]
pub struct Composition<A, B> {
    name: &'static str,
    head: A,
    tail: B,
}

impl<A: IntegerCodec, B: IntegerCodec> Composition<A, B> {
    pub fn new(name: &'static str, head: A, tail: B) -> Self {
        Self { name, head, tail }
    }
}

impl<A: IntegerCodec, B: IntegerCodec> IntegerCodec for Composition<A, B> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let first = self.head.compress(input, output)?;
        let second = self
            .tail
            .compress(&input[first.consumed..], &mut output[first.written..])?;
        Ok(Progress::new(
            first.consumed + second.consumed,
            first.written + second.written,
        ))
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let first = self.head.uncompress(input, output)?;
        let second = self
            .tail
            .uncompress(&input[first.consumed..], &mut output[first.written..])?;
        Ok(Progress::new(
            first.consumed + second.consumed,
            first.written + second.written,
        ))
    }
}
