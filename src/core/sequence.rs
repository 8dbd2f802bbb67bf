use bio::alphabets::dna;
use rand::seq::SliceRandom;
use rand::Rng;

/// A named nucleotide sequence read from FASTA or FASTQ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Record identifier (first word of the header line)
    pub name: String,

    /// Bases as read from the input
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Reverse complement of a nucleotide sequence.
///
/// IUPAC ambiguity codes are complemented; symbols without a complement
/// (such as the `X` modified-base marker) are kept as-is. Case is preserved.
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    dna::revcomp(seq)
}

/// Uppercase a sequence so it can be looked up in the scoring matrix
#[must_use]
pub fn normalize(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(u8::to_ascii_uppercase).collect()
}

/// Random permutation of the bases of `seq` (same composition, no structure)
pub fn shuffled<R: Rng + ?Sized>(seq: &[u8], rng: &mut R) -> Vec<u8> {
    let mut bases = seq.to_vec();
    bases.shuffle(rng);
    bases
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT".to_vec());
        assert_eq!(reverse_complement(b"AACG"), b"CGTT".to_vec());
        assert_eq!(reverse_complement(b"ANNT"), b"ANNT".to_vec());
        assert_eq!(reverse_complement(b""), Vec::<u8>::new());
    }

    #[test]
    fn test_reverse_complement_is_involution() {
        let seqs: [&[u8]; 4] = [
            b"ACTTGCCTGTCGCTCTATCTTC",
            b"TTTTTTTTTTTTTTTTTTTTVN",
            b"GATTACA",
            b"acgtNRY",
        ];
        for seq in seqs {
            assert_eq!(reverse_complement(&reverse_complement(seq)), seq.to_vec());
        }
    }

    #[test]
    fn test_shuffled_keeps_composition() {
        let mut rng = StdRng::seed_from_u64(7);
        let seq = b"AAAACCCGGT";
        let mut shuffled_seq = shuffled(seq, &mut rng);
        assert_eq!(shuffled_seq.len(), seq.len());

        shuffled_seq.sort_unstable();
        let mut sorted = seq.to_vec();
        sorted.sort_unstable();
        assert_eq!(shuffled_seq, sorted);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(b"acgTn"), b"ACGTN".to_vec());
    }
}
