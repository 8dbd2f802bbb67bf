use serde::{Deserialize, Serialize};

/// Strand on which a query is searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Query sequence as given in the input FASTA
    Forward,
    /// Reverse complement of the input sequence
    ReverseComplement,
}

impl Orientation {
    /// Strand symbol used in model names and summaries
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Forward => '+',
            Self::ReverseComplement => '-',
        }
    }

    /// Prefix placed in front of the query identifier in output file names
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Forward => "",
            Self::ReverseComplement => "-",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Compound key identifying a registered query: (identifier, orientation)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    pub id: String,
    pub orientation: Orientation,
}

impl QueryKey {
    pub fn new(id: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            id: id.into(),
            orientation,
        }
    }

    /// Name used for the per-query hit file stem, e.g. `-primer1` for the reverse strand
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}{}", self.orientation.file_prefix(), self.id)
    }

    /// Model name handed to the profile trainer, e.g. `pHMM+primer1`
    #[must_use]
    pub fn model_name(&self) -> String {
        format!("pHMM{}{}", self.orientation.symbol(), self.id)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.id, self.orientation)
    }
}

/// Format of the read input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFormat {
    #[default]
    Fastq,
    Fasta,
}

impl ReadFormat {
    /// Approximate on-disk size of a record, used for progress reporting
    #[must_use]
    pub fn record_size(self, name_len: usize, seq_len: usize) -> u64 {
        let bytes = match self {
            Self::Fastq => name_len + 2 * seq_len + 6,
            Self::Fasta => name_len + seq_len + 3,
        };
        bytes as u64
    }
}

impl std::fmt::Display for ReadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fastq => write!(f, "fastq"),
            Self::Fasta => write!(f, "fasta"),
        }
    }
}

impl std::str::FromStr for ReadFormat {
    type Err = crate::utils::validation::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fastq" | "fq" => Ok(Self::Fastq),
            "fasta" | "fa" => Ok(Self::Fasta),
            _ => Err(crate::utils::validation::ConfigError::UnknownFormat(
                s.to_string(),
            )),
        }
    }
}
