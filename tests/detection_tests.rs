//! End-to-end tests of query loading, calibration and read streaming.

mod common;

use std::fs::File;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::tempdir;

use hammerpede::detection::calibration::calibrate;
use hammerpede::{
    classify, reverse_complement, AlignmentMode, BioAligner, DetectionError, DetectionPipeline,
    MatchVerdict, Orientation, PipelineConfig, QueryKey, QueryRegistry, ReadFormat, ReadSource,
    ScoreConfig, SelfAlignment, ShuffledNull,
};

use common::{PRIMER, PRIMER_RC};

fn cli_aligner() -> BioAligner {
    BioAligner::new(&ScoreConfig::new(1, -1, 1, 1).unwrap()).with_mode(AlignmentMode::Overlap)
}

#[test]
fn test_acgt_scenario() {
    let aligner = BioAligner::new(&ScoreConfig::new(1, -2, 1, 1).unwrap());
    let cutoff = calibrate(b"ACGT", &aligner, 1.0);
    assert!((cutoff - 4.0).abs() < 1e-9);

    let MatchVerdict::Accepted(m) = classify(b"TTACGTTT", b"ACGT", cutoff, &aligner).unwrap()
    else {
        panic!("ACGT should be found in TTACGTTT");
    };
    assert_eq!(m.sequence, b"ACGT".to_vec());
    assert_eq!((m.reference_start, m.reference_end), (2, 6));
}

#[test]
fn test_reverse_complement_is_an_involution() {
    for seq in [PRIMER.as_bytes(), b"ACGTN".as_slice(), b"".as_slice()] {
        assert_eq!(reverse_complement(&reverse_complement(seq)), seq.to_vec());
    }
    assert_eq!(reverse_complement(PRIMER.as_bytes()), PRIMER_RC.as_bytes().to_vec());
}

#[test]
fn test_calibration_is_deterministic() {
    let dir = tempdir().unwrap();
    let queries = common::write_queries(dir.path());
    let aligner = cli_aligner();

    let first = QueryRegistry::load(&queries, &SelfAlignment::new(0.8), &aligner).unwrap();
    let second = QueryRegistry::load(&queries, &SelfAlignment::new(0.8), &aligner).unwrap();
    assert_eq!(first.queries(), second.queries());

    let forward = first.get(&QueryKey::new("VNP", Orientation::Forward)).unwrap();
    assert!((forward.cutoff - 17.6).abs() < 1e-9);

    let shuffled = ShuffledNull::new(0.9, 50, 7);
    let a = QueryRegistry::load(&queries, &shuffled, &aligner).unwrap();
    let b = QueryRegistry::load(&queries, &shuffled, &aligner).unwrap();
    assert_eq!(a.queries(), b.queries());
}

#[test]
fn test_duplicate_query_ids_rejected() {
    let dir = tempdir().unwrap();
    let queries = dir.path().join("dup.fasta");
    std::fs::write(&queries, format!(">VNP\n{PRIMER}\n>VNP\nACGTACGT\n")).unwrap();

    let result = QueryRegistry::load(&queries, &SelfAlignment::new(0.8), &cli_aligner());
    assert!(matches!(result, Err(DetectionError::DuplicateQuery(id)) if id == "VNP"));
}

#[test]
fn test_streams_gzipped_fastq() {
    let dir = tempdir().unwrap();
    let queries = common::write_queries(dir.path());
    let reads = dir.path().join("reads.fastq.gz");
    let mut encoder = GzEncoder::new(File::create(&reads).unwrap(), Compression::default());
    encoder.write_all(common::fastq_text().as_bytes()).unwrap();
    encoder.finish().unwrap();

    let aligner = cli_aligner();
    let registry = QueryRegistry::load(&queries, &SelfAlignment::new(0.8), &aligner).unwrap();
    let config = PipelineConfig {
        batch_size: 2,
        ..PipelineConfig::default()
    };
    let mut pipeline = DetectionPipeline::new(&registry, &aligner, config);
    let source = ReadSource::open(&reads, ReadFormat::Fastq).unwrap();
    assert_eq!(pipeline.stream(source, |_| {}).unwrap(), 5);

    let forward = pipeline
        .collection(&QueryKey::new("VNP", Orientation::Forward))
        .unwrap();
    let names: Vec<&str> = forward.fragments().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["read0_20:42", "read1_20:42", "read2_20:42"]);
    assert!(forward.fragments().iter().all(|f| f.sequence == PRIMER.as_bytes()));

    let reverse = pipeline
        .collection(&QueryKey::new("VNP", Orientation::ReverseComplement))
        .unwrap();
    assert_eq!(reverse.len(), 1);
    assert_eq!(reverse.fragments()[0].name, "read3_20:42");
    assert_eq!(reverse.fragments()[0].sequence, PRIMER_RC.as_bytes().to_vec());
}

#[test]
fn test_fasta_and_fastq_inputs_agree() {
    let dir = tempdir().unwrap();
    let queries = common::write_queries(dir.path());
    let fastq = dir.path().join("reads.fastq");
    let fasta = dir.path().join("reads.fasta");
    std::fs::write(&fastq, common::fastq_text()).unwrap();
    std::fs::write(&fasta, common::fasta_text()).unwrap();

    let aligner = cli_aligner();
    let registry = QueryRegistry::load(&queries, &SelfAlignment::new(0.8), &aligner).unwrap();

    let mut collected = Vec::new();
    for (path, format) in [(&fastq, ReadFormat::Fastq), (&fasta, ReadFormat::Fasta)] {
        let mut pipeline = DetectionPipeline::new(&registry, &aligner, PipelineConfig::default());
        pipeline
            .stream(ReadSource::open(path, format).unwrap(), |_| {})
            .unwrap();
        collected.push(pipeline.collections().to_vec());
    }
    assert_eq!(collected[0], collected[1]);
}
