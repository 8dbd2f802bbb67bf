use serde::{Deserialize, Serialize};

use crate::core::types::{Orientation, QueryKey};

/// A calibrated query sequence in one orientation.
///
/// Created once per input record and orientation by the query registry and
/// never modified afterwards: the cutoff is computed from this sequence and
/// reused unchanged for every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Identifier from the query FASTA
    pub id: String,

    /// Strand this sequence represents
    pub orientation: Orientation,

    /// Bases, uppercased (reverse complemented for the reverse orientation)
    #[serde(with = "seq_as_string")]
    pub sequence: Vec<u8>,

    /// Score cutoff for a full-length match
    pub cutoff: f64,
}

impl Query {
    pub fn new(
        id: impl Into<String>,
        orientation: Orientation,
        sequence: Vec<u8>,
        cutoff: f64,
    ) -> Self {
        Self {
            id: id.into(),
            orientation,
            sequence,
            cutoff,
        }
    }

    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.id.clone(), self.orientation)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Cutoff expressed as score per query base
    #[must_use]
    pub fn score_density(&self) -> f64 {
        if self.sequence.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.cutoff / self.sequence.len() as f64
        }
    }
}

mod seq_as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seq: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(seq))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.into_bytes())
    }
}
