#[cfg(test)]
mod kmer_counter_roundtrip_tests {
    use kmkm::counter::KmerCounter;

    #[test]
    fn save_then_load_preserves_k_canonical_and_counts() {
        let mut counter: KmerCounter<u8> = KmerCounter::new(4, 1024, true, 0);
        counter.consume(b"ACGTACGTACGT").unwrap();
        counter.consume(b"TTTTGGGGCCCC").unwrap();

        let tmp = tempfile::Builder::new().suffix(".kmr").tempfile().unwrap();
        counter.save(tmp.path()).unwrap();

        let loaded: KmerCounter<u8> = KmerCounter::load(tmp.path()).unwrap();
        assert_eq!(loaded.k(), counter.k());
        assert_eq!(loaded.nnz(), counter.nnz());
        assert_eq!(
            loaded.counts().as_slice(),
            counter.counts().as_slice()
        );
    }

    #[test]
    fn save_then_load_round_trips_through_gzip() {
        let mut counter: KmerCounter<u8> = KmerCounter::new(3, 256, false, 0);
        counter.consume(b"GATTACAGATTACA").unwrap();

        let tmp = tempfile::Builder::new()
            .suffix(".kmr.gz")
            .tempfile()
            .unwrap();
        counter.save(tmp.path()).unwrap();

        let loaded: KmerCounter<u8> = KmerCounter::load(tmp.path()).unwrap();
        assert_eq!(loaded.counts().as_slice(), counter.counts().as_slice());
    }

    #[test]
    fn a_counter_built_from_a_fastx_file_matches_direct_consume() {
        use kmkm::io::SeqSource;
        use std::io::Write;

        let mut fasta = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        writeln!(fasta, ">r1").unwrap();
        writeln!(fasta, "ACGTACGTACGT").unwrap();
        writeln!(fasta, ">r2").unwrap();
        writeln!(fasta, "TTTTGGGGCCCC").unwrap();

        let mut from_file: KmerCounter<u8> = KmerCounter::new(4, 1024, true, 0);
        let mut source = SeqSource::open(fasta.path()).unwrap();
        let nrecords = from_file.consume_from(&mut source).unwrap();
        assert_eq!(nrecords, 2);

        let mut direct: KmerCounter<u8> = KmerCounter::new(4, 1024, true, 0);
        direct.consume(b"ACGTACGTACGT").unwrap();
        direct.consume(b"TTTTGGGGCCCC").unwrap();

        assert_eq!(from_file.counts().as_slice(), direct.counts().as_slice());
    }
}
