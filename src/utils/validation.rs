//! Centralized validation of run configuration.

use std::path::Path;

/// Largest accepted query length; longer sequences are not primers or barcodes
/// and would make every read alignment quadratic in a large term.
pub const MAX_QUERY_LENGTH: usize = 10_000;

/// Maximum number of query records in a single FASTA
pub const MAX_QUERIES: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed alignment parameters: {0}")]
    MalformedAlignParams(String),

    #[error("Invalid alignment scoring: {0}")]
    InvalidScoring(String),

    #[error("Unknown input format '{0}' (expected fastq or fasta)")]
    UnknownFormat(String),

    #[error("Score cutoff fraction must be in (0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("Output directory already exists: {0}")]
    OutputDirExists(String),

    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
}

/// Validate the fraction of the self-alignment score a hit must reach.
///
/// # Errors
///
/// Returns `ConfigError::InvalidFraction` unless `0 < fraction <= 1`.
pub fn validate_fraction(fraction: f64) -> Result<f64, ConfigError> {
    if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
        Ok(fraction)
    } else {
        Err(ConfigError::InvalidFraction(fraction))
    }
}

/// Validate that a count-like option is non-zero.
///
/// # Errors
///
/// Returns `ConfigError::ZeroCount` naming the option.
pub fn validate_nonzero(value: usize, name: &'static str) -> Result<usize, ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroCount(name))
    } else {
        Ok(value)
    }
}

/// Check the output directory does not exist yet.
///
/// # Errors
///
/// Returns `ConfigError::OutputDirExists` if anything is present at `path`.
pub fn check_output_dir(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        Err(ConfigError::OutputDirExists(path.display().to_string()))
    } else {
        Ok(())
    }
}

/// Check if adding another query would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new query.
#[must_use]
pub fn check_query_limit(count: usize) -> Option<String> {
    if count >= MAX_QUERIES {
        Some(format!(
            "Too many queries: adding another would exceed maximum of {MAX_QUERIES}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fraction() {
        assert!(validate_fraction(0.8).is_ok());
        assert!(validate_fraction(1.0).is_ok());
        assert!(validate_fraction(0.0).is_err());
        assert!(validate_fraction(1.5).is_err());
        assert!(validate_fraction(-0.1).is_err());
        assert!(validate_fraction(f64::NAN).is_err());
    }

    #[test]
    fn test_check_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_output_dir(dir.path()),
            Err(ConfigError::OutputDirExists(_))
        ));
        assert!(check_output_dir(&dir.path().join("fresh")).is_ok());
    }

    #[test]
    fn test_validate_nonzero() {
        assert_eq!(validate_nonzero(3, "--samples").unwrap(), 3);
        assert!(matches!(
            validate_nonzero(0, "--samples"),
            Err(ConfigError::ZeroCount("--samples"))
        ));
    }

    #[test]
    fn test_check_query_limit() {
        assert!(check_query_limit(0).is_none());
        assert!(check_query_limit(MAX_QUERIES).is_some());
    }
}
