//! Core data types for query detection.
//!
//! - [`types::Orientation`], [`types::QueryKey`]: strand and (identifier, strand) key
//! - [`types::ReadFormat`]: FASTA/FASTQ read input
//! - [`query::Query`]: a calibrated query in one orientation
//! - [`sequence::SequenceRecord`]: a named read or query sequence, plus
//!   reverse-complement, normalization and shuffle helpers
//!
//! ## Orientation naming
//!
//! | Strand | Key display | Hit file | Model name |
//! |--------|-------------|----------|------------|
//! | forward | `VNP+` | `hits_VNP.fasta` | `VNP` |
//! | reverse complement | `VNP-` | `hits_-VNP.fasta` | `-VNP` |

pub mod query;
pub mod sequence;
pub mod types;
