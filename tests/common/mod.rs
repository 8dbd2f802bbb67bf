//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const PRIMER: &str = "ACTTGCCTGTCGCTCTATCTTC";
pub const PRIMER_RC: &str = "GAAGATAGAGCGACAGGCAAGT";

/// Three reads carrying the primer, one its reverse complement and one
/// unrelated; every insert sits at offsets 20..42.
pub const READS: [(&str, &str); 5] = [
    (
        "read0",
        "GTGCTTGAAATATGCGACCCACTTGCCTGTCGCTCTATCTTCCTAAGTAGGAGCGTATGCGC",
    ),
    (
        "read1",
        "CCAGTAACCAATGCCTGTTGACTTGCCTGTCGCTCTATCTTCAGATGCCAGACGCGTAACCA",
    ),
    (
        "read2",
        "AAACATAGAAACCATCAATAACTTGCCTGTCGCTCTATCTTCGACAGGTCATAATCGGTCCA",
    ),
    (
        "read3",
        "CCGGATCATTGGTGCATAGAGAAGATAGAGCGACAGGCAAGTGCCTGGGCGTTAACGCCCTT",
    ),
    (
        "read4",
        "TATTACTAGCTTAATGGTATTTAGTTGTGCCGCAGCGAAGTACACATTGACAAACACGGCAT",
    ),
];

pub fn write_queries(dir: &Path) -> PathBuf {
    let path = dir.join("primers.fasta");
    fs::write(&path, format!(">VNP\n{PRIMER}\n")).unwrap();
    path
}

pub fn fastq_text() -> String {
    READS
        .iter()
        .map(|(name, seq)| format!("@{name}\n{seq}\n+\n{}\n", "I".repeat(seq.len())))
        .collect()
}

pub fn fasta_text() -> String {
    READS
        .iter()
        .map(|(name, seq)| format!(">{name}\n{seq}\n"))
        .collect()
}

/// Executable shell scripts standing in for spoa, hmmbuild and hmmpress
#[cfg(unix)]
pub fn fake_tools(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let write = |name: &str, body: &str| {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    };
    (
        write("spoa", "echo 'Multiple sequence alignment'\ngrep -v '>' \"$5\""),
        write("hmmbuild", "echo \"NAME  $2\" > \"$4\"\necho '//' >> \"$4\""),
        write("hmmpress", "[ \"$1\" = \"-f\" ] || exit 2\ntouch \"$2.h3m\""),
    )
}
