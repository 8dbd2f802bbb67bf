use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::types::QueryKey;
use crate::external::{run_tool, ToolError};

pub const DEFAULT_HMMBUILD: &str = "hmmbuild";
pub const DEFAULT_HMMPRESS: &str = "hmmpress";

/// Profile-HMM construction with the HMMER suite
#[derive(Debug, Clone)]
pub struct Hmmer {
    hmmbuild: PathBuf,
    hmmpress: PathBuf,
}

impl Default for Hmmer {
    fn default() -> Self {
        Self::new(DEFAULT_HMMBUILD, DEFAULT_HMMPRESS)
    }
}

impl Hmmer {
    pub fn new(hmmbuild: impl Into<PathBuf>, hmmpress: impl Into<PathBuf>) -> Self {
        Self {
            hmmbuild: hmmbuild.into(),
            hmmpress: hmmpress.into(),
        }
    }

    /// Build a DNA model for `key` from a multiple alignment.
    ///
    /// The model is trained under [`QueryKey::model_name`] and then renamed so
    /// forward models carry the bare identifier and reverse models `-<id>`.
    ///
    /// # Errors
    ///
    /// Returns a `ToolError` if hmmbuild fails or the model cannot be rewritten.
    pub fn build_model(
        &self,
        key: &QueryKey,
        alignment: &Path,
        output: &Path,
    ) -> Result<(), ToolError> {
        let name = key.model_name();
        let args = [
            OsStr::new("-n"),
            OsStr::new(&name),
            OsStr::new("--dna"),
            output.as_os_str(),
            alignment.as_os_str(),
        ];
        run_tool(&self.hmmbuild, args)?;

        let model = fs::read_to_string(output)?;
        fs::write(output, strip_strand_tags(&model))?;
        debug!("Built model {} at {}", key, output.display());
        Ok(())
    }

    /// Concatenate `models` into `database` and index it with `hmmpress -f`.
    ///
    /// # Errors
    ///
    /// Returns a `ToolError` if a model cannot be read, the database cannot be
    /// written, or hmmpress fails.
    pub fn build_database(&self, models: &[PathBuf], database: &Path) -> Result<(), ToolError> {
        let mut writer = BufWriter::new(File::create(database)?);
        for model in models {
            io::copy(&mut File::open(model)?, &mut writer)?;
        }
        writer.flush()?;
        drop(writer);

        run_tool(&self.hmmpress, [OsStr::new("-f"), database.as_os_str()])?;
        debug!("Indexed {} models into {}", models.len(), database.display());
        Ok(())
    }
}

/// Remove the strand tag from model names: `pHMM+` is dropped, `pHMM-` becomes `-`
#[must_use]
pub fn strip_strand_tags(model: &str) -> String {
    model.replace("pHMM+", "").replace("pHMM-", "-")
}
