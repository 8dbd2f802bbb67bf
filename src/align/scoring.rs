//! Scoring configuration and the substitution matrix derived from it.

use serde::{Deserialize, Serialize};

use crate::utils::validation::ConfigError;

/// Alignment parameters shared read-only by every alignment in a run.
///
/// `gap_open` and `gap_extend` are non-negative costs: a gap of length `k`
/// costs `gap_open + (k - 1) * gap_extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Reward for two identical standard bases
    #[serde(rename = "match")]
    pub match_score: i32,

    /// Score for two different standard bases (usually negative)
    pub mismatch: i32,

    /// Cost of the first position of a gap
    pub gap_open: i32,

    /// Cost of each further position of a gap
    pub gap_extend: i32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch: -2,
            gap_open: 1,
            gap_extend: 1,
        }
    }
}

impl ScoreConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScoring` if the match reward is not positive,
    /// a gap cost is negative, or `gap_open < gap_extend`.
    pub fn new(
        match_score: i32,
        mismatch: i32,
        gap_open: i32,
        gap_extend: i32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            match_score,
            mismatch,
            gap_open,
            gap_extend,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters can be expressed as an affine gap model.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScoring` describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_score <= 0 {
            return Err(ConfigError::InvalidScoring(format!(
                "match reward must be positive, got {}",
                self.match_score
            )));
        }
        if self.gap_open < 0 || self.gap_extend < 0 {
            return Err(ConfigError::InvalidScoring(format!(
                "gap costs must be non-negative, got open={} extend={}",
                self.gap_open, self.gap_extend
            )));
        }
        if self.gap_open < self.gap_extend {
            return Err(ConfigError::InvalidScoring(format!(
                "gap_open ({}) must not be smaller than gap_extend ({})",
                self.gap_open, self.gap_extend
            )));
        }
        Ok(())
    }

    /// Gap open score in the convention where a gap of length `k` scores
    /// `open + k * extend` (both non-positive).
    #[must_use]
    pub fn affine_open(&self) -> i32 {
        -(self.gap_open - self.gap_extend)
    }

    /// Gap extension score in the `open + k * extend` convention
    #[must_use]
    pub fn affine_extend(&self) -> i32 {
        -self.gap_extend
    }
}

impl std::str::FromStr for ScoreConfig {
    type Err = ConfigError;

    /// Parse `match,mismatch,gap_open,gap_extend`, e.g. `1,-1,1,1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(ConfigError::MalformedAlignParams(format!(
                "expected 4 comma-separated integers (match,mismatch,gap_open,gap_extend), got '{s}'"
            )));
        }

        let mut values = [0i32; 4];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|_| {
                ConfigError::MalformedAlignParams(format!("'{field}' is not an integer in '{s}'"))
            })?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }
}

impl std::fmt::Display for ScoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.match_score, self.mismatch, self.gap_open, self.gap_extend
        )
    }
}

/// Symbol classes of the substitution matrix
const CLASS_A: u8 = 0;
const CLASS_C: u8 = 1;
const CLASS_G: u8 = 2;
const CLASS_T: u8 = 3;
const CLASS_AMBIGUOUS: u8 = 4;
const CLASS_MODIFIED: u8 = 5;
const CLASS_OTHER: u8 = 6;
const CLASS_PAD: u8 = 7;
const NUM_CLASSES: usize = 8;

/// Filler placed around a reference so a query may hang over its ends.
/// Scores zero against every symbol.
pub const PAD: u8 = 0;

/// Rewards for the two wildcard symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WildcardScores {
    /// Score of `N` against any symbol
    pub ambiguous: i32,

    /// Score of `X` (modified-base marker) against any symbol
    pub modified: i32,
}

/// Substitution matrix over `ACGT`, the `N` wildcard and the `X` modified-base
/// marker. Lookup is case-insensitive; any other symbol scores as a mismatch.
///
/// `X` takes precedence over `N`, so `N` against `X` scores the modified reward.
/// The [`PAD`] byte scores zero against everything.
#[derive(Debug, Clone)]
pub struct ScoringMatrix {
    classes: [u8; 256],
    scores: [[i32; NUM_CLASSES]; NUM_CLASSES],
}

impl ScoringMatrix {
    /// Matrix with zero-reward wildcards
    #[must_use]
    pub fn new(config: &ScoreConfig) -> Self {
        Self::with_wildcards(config, WildcardScores::default())
    }

    #[must_use]
    pub fn with_wildcards(config: &ScoreConfig, wildcards: WildcardScores) -> Self {
        let mut classes = [CLASS_OTHER; 256];
        classes[PAD as usize] = CLASS_PAD;
        for (symbol, class) in [
            (b'A', CLASS_A),
            (b'C', CLASS_C),
            (b'G', CLASS_G),
            (b'T', CLASS_T),
            (b'N', CLASS_AMBIGUOUS),
            (b'X', CLASS_MODIFIED),
        ] {
            classes[symbol as usize] = class;
            classes[symbol.to_ascii_lowercase() as usize] = class;
        }

        let mut scores = [[config.mismatch; NUM_CLASSES]; NUM_CLASSES];
        for (a, row) in scores.iter_mut().enumerate() {
            for (b, score) in row.iter_mut().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let (a, b) = (a as u8, b as u8);
                *score = if a == CLASS_PAD || b == CLASS_PAD {
                    0
                } else if a == CLASS_MODIFIED || b == CLASS_MODIFIED {
                    wildcards.modified
                } else if a == CLASS_AMBIGUOUS || b == CLASS_AMBIGUOUS {
                    wildcards.ambiguous
                } else if a == b && a != CLASS_OTHER {
                    config.match_score
                } else {
                    config.mismatch
                };
            }
        }

        Self { classes, scores }
    }

    /// Score of aligning symbol `a` against symbol `b`
    #[inline]
    #[must_use]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let a = self.classes[a as usize] as usize;
        let b = self.classes[b as usize] as usize;
        self.scores[a][b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_config() {
        let config: ScoreConfig = "1,-1,1,1".parse().unwrap();
        assert_eq!(config, ScoreConfig::new(1, -1, 1, 1).unwrap());
        assert_eq!(config.to_string(), "1,-1,1,1");

        let spaced: ScoreConfig = " 2, -3 ,5,2".parse().unwrap();
        assert_eq!(spaced.match_score, 2);
        assert_eq!(spaced.mismatch, -3);
        assert_eq!(spaced.gap_open, 5);
        assert_eq!(spaced.gap_extend, 2);
    }

    #[test]
    fn test_parse_score_config_malformed() {
        assert!(matches!(
            "1,-1,1".parse::<ScoreConfig>(),
            Err(ConfigError::MalformedAlignParams(_))
        ));
        assert!(matches!(
            "1,-1,one,1".parse::<ScoreConfig>(),
            Err(ConfigError::MalformedAlignParams(_))
        ));
        assert!(matches!(
            "1,-1,1,1,1".parse::<ScoreConfig>(),
            Err(ConfigError::MalformedAlignParams(_))
        ));
    }

    #[test]
    fn test_invalid_penalties() {
        assert!(matches!(
            ScoreConfig::new(0, -1, 1, 1),
            Err(ConfigError::InvalidScoring(_))
        ));
        assert!(matches!(
            ScoreConfig::new(1, -1, -1, 1),
            Err(ConfigError::InvalidScoring(_))
        ));
        assert!(matches!(
            ScoreConfig::new(1, -1, 1, 2),
            Err(ConfigError::InvalidScoring(_))
        ));
    }

    #[test]
    fn test_affine_conversion() {
        let config = ScoreConfig::new(1, -1, 5, 2).unwrap();
        // Gap of length 3: 5 + 2 * 2 = 9
        assert_eq!(config.affine_open() + 3 * config.affine_extend(), -9);

        let unit = ScoreConfig::default();
        assert_eq!(unit.affine_open(), 0);
        assert_eq!(unit.affine_extend(), -1);
    }

    #[test]
    fn test_matrix_standard_bases() {
        let matrix = ScoringMatrix::new(&ScoreConfig::default());
        assert_eq!(matrix.score(b'A', b'A'), 1);
        assert_eq!(matrix.score(b'a', b'A'), 1);
        assert_eq!(matrix.score(b'A', b'C'), -2);
        assert_eq!(matrix.score(b'T', b'g'), -2);
        assert_eq!(matrix.score(b'R', b'R'), -2);
    }

    #[test]
    fn test_matrix_wildcards() {
        let config = ScoreConfig::default();
        let matrix = ScoringMatrix::new(&config);
        for base in *b"ACGTN" {
            assert_eq!(matrix.score(b'N', base), 0);
            assert_eq!(matrix.score(base, b'N'), 0);
            assert_eq!(matrix.score(b'X', base), 0);
        }

        let custom = ScoringMatrix::with_wildcards(
            &config,
            WildcardScores {
                ambiguous: 1,
                modified: -1,
            },
        );
        assert_eq!(custom.score(b'N', b'G'), 1);
        assert_eq!(custom.score(b'C', b'X'), -1);
        assert_eq!(custom.score(b'N', b'X'), -1);
        assert_eq!(custom.score(PAD, b'X'), 0);
        assert_eq!(custom.score(b'A', PAD), 0);
    }
}
