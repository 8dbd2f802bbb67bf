//! FASTA query loading (noodles) and fragment writing (rust-bio).

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use noodles::fasta;
use tracing::debug;

use crate::core::sequence::SequenceRecord;
use crate::parsing::{open_input, ParseError};
use crate::utils::validation::check_query_limit;

/// Parse all records of a query FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no records are found, or
/// `ParseError::TooManyRecords` if the query limit is exceeded.
pub fn read_fasta_file(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let records = read_fasta(open_input(path)?)?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse all records from a buffered FASTA source.
///
/// # Errors
///
/// See [`read_fasta_file`].
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut records = Vec::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if let Some(msg) = check_query_limit(records.len()) {
            return Err(ParseError::TooManyRecords(msg));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        records.push(SequenceRecord::new(name, record.sequence().as_ref().to_vec()));
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(records)
}

/// Write records to a FASTA file, one unwrapped sequence line per record.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be created or written.
pub fn write_fasta_file<'a, I>(path: &Path, records: I) -> Result<usize, ParseError>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut writer = bio::io::fasta::Writer::new(File::create(path)?);
    let mut count = 0;
    for (name, sequence) in records {
        writer.write(name, None, sequence)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
