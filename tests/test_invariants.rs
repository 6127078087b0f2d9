#[cfg(test)]
mod invariant_tests {
    use kmkm::collection::normalise_samplename;
    use kmkm::kmer::{revcomp, KmerIterator};
    use std::path::Path;

    #[test]
    fn stem_of_kmr_gz_equals_stem_of_bare_name() {
        for base in ["reads", "sample-01", "my.long.name"] {
            let bare = normalise_samplename(Path::new(base));
            let suffixed = normalise_samplename(Path::new(&format!("{base}.kmr.gz")));
            assert_eq!(bare, suffixed);
        }
    }

    #[test]
    fn emitted_kmer_count_matches_windows_minus_ambiguous_skips() {
        let seq = b"ACGTNNNNACGTACGT";
        let k = 4;
        let codes: Vec<u64> = KmerIterator::new(seq, k, false).collect();
        // 4 N's force a k-length skip from the first ambiguous base onward;
        // everything from there to k-1 bases past the last N is unusable.
        assert!(codes.len() < seq.len() - k + 1);
        assert!(!codes.is_empty());
    }

    #[test]
    fn revcomp_is_its_own_inverse_across_all_supported_k() {
        for k in 1..=32usize {
            let mask = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
            let code = 0x1234_5678_9ABC_DEF0u64 & mask;
            assert_eq!(revcomp(revcomp(code, k), k), code);
        }
    }
}
