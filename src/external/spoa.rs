use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

use bio::io::fasta;

use crate::external::{run_tool, ToolError};

pub const DEFAULT_SPOA: &str = "spoa";

/// Partial-order aligner producing one gapped row per input fragment
#[derive(Debug, Clone)]
pub struct Spoa {
    program: PathBuf,
}

impl Default for Spoa {
    fn default() -> Self {
        Self::new(DEFAULT_SPOA)
    }
}

impl Spoa {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Align the sequences of `input` and write the rows to `output` as
    /// FASTA records `s0`, `s1`, ...
    ///
    /// The first line of the tool's report is a header and is discarded.
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns a `ToolError` if spoa fails or `output` cannot be written.
    pub fn build_consensus(&self, input: &Path, output: &Path) -> Result<usize, ToolError> {
        let args = [
            OsStr::new("-l"),
            OsStr::new("1"),
            OsStr::new("-r"),
            OsStr::new("1"),
            input.as_os_str(),
        ];
        let result = run_tool(&self.program, args)?;
        let report = String::from_utf8_lossy(&result.stdout);

        let mut writer = fasta::Writer::new(File::create(output)?);
        let mut rows = 0;
        for line in report.lines().skip(1).map(str::trim_end) {
            if line.is_empty() {
                continue;
            }
            writer.write(&format!("s{rows}"), None, line.as_bytes())?;
            rows += 1;
        }
        writer.flush()?;
        Ok(rows)
    }
}
