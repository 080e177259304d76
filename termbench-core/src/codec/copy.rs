//! Identity codec used as the control column

use super::{IntegerCodec, Progress};
use crate::error::{Error, Result};

const NAME: &str = "copy";

/// Copies integers verbatim: exactly one word per integer
#[derive(Debug, Clone, Copy, Default)]
pub struct JustCopy;

impl JustCopy {
    fn copy(input: &[u32], output: &mut [u32]) -> Result<Progress> {
        let n = input.len();
        let capacity = output.len();
        let target = output
            .get_mut(..n)
            .ok_or(Error::OutputCapacity { codec: NAME, capacity })?;
        target.copy_from_slice(input);
        Ok(Progress::new(n, n))
    }
}

impl IntegerCodec for JustCopy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        Self::copy(input, output)
    }

    fn uncompress(&self, input: &[u32], output: &mut [u32]) -> Result<Progress> {
        Self::copy(input, output)
    }
}
