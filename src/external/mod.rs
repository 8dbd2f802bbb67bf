//! Wrappers around the external consensus and profile-model tools.
//!
//! - [`spoa`]: partial-order alignment of the fragments of one query
//! - [`hmmer`]: `hmmbuild` per alignment, `hmmpress` over the concatenated database
//! - [`models`]: the finalize stage chaining both over every fragment collection

pub mod hmmer;
pub mod models;
pub mod spoa;

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use thiserror::Error;
use tracing::debug;

pub use hmmer::Hmmer;
pub use models::{ModelBuilder, ModelSet, QueryModel};
pub use spoa::Spoa;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Could not execute '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' failed with {status}: {detail}")]
    Failed {
        tool: String,
        status: String,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run `program` with `args` to completion, capturing its output.
///
/// # Errors
///
/// Returns `ToolError::Spawn` if the program cannot be started and
/// `ToolError::Failed` if it exits unsuccessfully.
pub fn run_tool<I, S>(program: &Path, args: I) -> Result<Output, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = program.display().to_string();
    let mut command = Command::new(program);
    command.args(args);
    debug!("Running {:?}", command);

    let output = command.output().map_err(|source| ToolError::Spawn {
        tool: tool.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            "no diagnostic output".to_string()
        } else {
            stderr
        };
        return Err(ToolError::Failed {
            tool,
            status: output.status.to_string(),
            detail,
        });
    }

    Ok(output)
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_run_tool_captures_stdout() {
        let dir = tempdir().unwrap();
        let script = testing::write_script(dir.path(), "echo.sh", "echo \"$1-$2\"");
        let output = run_tool(&script, ["a", "b"]).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "a-b\n");
    }

    #[test]
    fn test_run_tool_reports_exit_status() {
        let dir = tempdir().unwrap();
        let script = testing::write_script(dir.path(), "fail.sh", "echo broken >&2\nexit 3");
        let err = run_tool(&script, Vec::<&str>::new()).unwrap_err();
        match err {
            ToolError::Failed {
                tool,
                status,
                detail,
            } => {
                assert!(tool.ends_with("fail.sh"));
                assert!(status.contains('3'));
                assert_eq!(detail, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_tool_missing_program() {
        let dir = tempdir().unwrap();
        let err = run_tool(&dir.path().join("no-such-tool"), ["x"]).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
        assert!(err.to_string().contains("no-such-tool"));
    }
}
