//! Lazy FASTA/FASTQ read streaming.

use std::io::BufRead;
use std::path::Path;

use noodles::{fasta, fastq};

use crate::core::sequence::SequenceRecord;
use crate::core::types::ReadFormat;
use crate::parsing::{open_input, ParseError};

type BoxedReader = Box<dyn BufRead + Send>;

enum Inner {
    Fasta(fasta::io::Reader<BoxedReader>),
    Fastq(fastq::io::Reader<BoxedReader>),
}

/// Read source yielding records in file order.
///
/// Records are decoded on demand; the source may be arbitrarily long.
pub struct ReadSource {
    inner: Inner,
}

impl ReadSource {
    /// Open a read file in the given format.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened.
    pub fn open(path: &Path, format: ReadFormat) -> Result<Self, ParseError> {
        Ok(Self::from_reader(open_input(path)?, format))
    }

    pub fn from_reader(reader: BoxedReader, format: ReadFormat) -> Self {
        let inner = match format {
            ReadFormat::Fasta => Inner::Fasta(fasta::io::Reader::new(reader)),
            ReadFormat::Fastq => Inner::Fastq(fastq::io::Reader::new(reader)),
        };
        Self { inner }
    }
}

impl Iterator for ReadSource {
    type Item = Result<SequenceRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Fasta(reader) => reader.records().next().map(|result| {
                result
                    .map(|record| {
                        SequenceRecord::new(
                            record_name(record.name()),
                            record.sequence().as_ref().to_vec(),
                        )
                    })
                    .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))
            }),
            Inner::Fastq(reader) => reader.records().next().map(|result| {
                result
                    .map(|record| {
                        SequenceRecord::new(
                            record_name(record.name()),
                            record.sequence().to_vec(),
                        )
                    })
                    .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))
            }),
        }
    }
}

/// Identifier of a record: the header up to the first whitespace
fn record_name(header: &[u8]) -> String {
    let name = header
        .split(u8::is_ascii_whitespace)
        .next()
        .unwrap_or_default();
    String::from_utf8_lossy(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(content: &'static [u8], format: ReadFormat) -> ReadSource {
        ReadSource::from_reader(Box::new(content), format)
    }

    #[test]
    fn test_fastq_records() {
        let content = b"@read1 runid=abc\nTTACGTTT\n+\nIIIIIIII\n@read2\nGGGG\n+\n!!!!\n";
        let records: Vec<_> = source(content, ReadFormat::Fastq)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "read1");
        assert_eq!(records[0].sequence, b"TTACGTTT".to_vec());
        assert_eq!(records[1].name, "read2");
    }

    #[test]
    fn test_fasta_records() {
        let content = b">read1\nTTAC\nGTTT\n>read2\nGGGG\n";
        let records: Vec<_> = source(content, ReadFormat::Fasta)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records[0].sequence, b"TTACGTTT".to_vec());
        assert_eq!(records[1].name, "read2");
    }

    #[test]
    fn test_malformed_fastq_is_an_error() {
        let content = b"@read1\nACGT\n-\nIIII\n";
        let first = source(content, ReadFormat::Fastq).next().unwrap();
        assert!(matches!(first, Err(ParseError::Noodles(_))));
    }
}
