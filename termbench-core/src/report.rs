//! Tab-separated benchmark report

use std::io::Write;

use crate::codec::CodecKind;
use crate::error::Result;

/// Metrics for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRecord<'a> {
    pub length: usize,
    pub entropy: f64,
    /// One value per codec, in roster order
    pub bits_per_integer: &'a [f64],
}

/// Writes the header line and one line per document
pub struct ReportWriter<W: Write> {
    out: W,
    line: String,
    records: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: String::with_capacity(128),
            records: 0,
        }
    }

    /// `# length<TAB>entropy<TAB>bpi(<codec>)...`
    pub fn write_header(&mut self, roster: &[CodecKind]) -> Result<()> {
        write!(self.out, "# length\tentropy")?;
        for kind in roster {
            write!(self.out, "\tbpi({})", kind.name())?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &BenchmarkRecord<'_>) -> Result<()> {
        use std::fmt::Write as _;

        self.line.clear();
        // fmt::Write into a String cannot fail
        let _ = write!(self.line, "{}\t{:.2}", record.length, record.entropy);
        for bpi in record.bits_per_integer {
            let _ = write!(self.line, "\t{:.2}", bpi);
        }
        self.line.push('\n');
        self.out.write_all(self.line.as_bytes())?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
