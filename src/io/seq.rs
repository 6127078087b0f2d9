//! Sequence source collaborator (component F, §6): streams sequence records
//! out of a (possibly gzip-compressed) FASTA or FASTQ file. Record
//! identifiers and quality strings are ignored — only the base sequence
//! matters to the counting engine.

use crate::error::{Error, Result};
use bio::io::{fasta, fastq};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Streams sequences out of a single FASTX file, auto-detecting format from
/// the leading record marker (`>` for FASTA, `@` for FASTQ) and transparent
/// gzip decompression from the `.gz` filename suffix.
///
/// The underlying fasta/fastq record types differ, so the source erases
/// them to a single iterator over raw sequence bytes right at construction.
pub struct SeqSource {
    records: Box<dyn Iterator<Item = io::Result<Vec<u8>>> + Send>,
}

impl SeqSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let is_gz = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        let mut reader: BufReader<Box<dyn Read + Send>> = if is_gz {
            BufReader::new(Box::new(MultiGzDecoder::new(file)))
        } else {
            BufReader::new(Box::new(file))
        };

        let first_byte = {
            let buf = reader.fill_buf()?;
            buf.first().copied()
        };

        let records: Box<dyn Iterator<Item = io::Result<Vec<u8>>> + Send> = match first_byte {
            Some(b'@') => Box::new(
                fastq::Reader::new(reader)
                    .records()
                    .map(|r| r.map(|rec| rec.seq().to_vec())),
            ),
            _ => Box::new(
                fasta::Reader::new(reader)
                    .records()
                    .map(|r| r.map(|rec| rec.seq().to_vec())),
            ),
        };

        Ok(SeqSource { records })
    }

    /// Fill `buf` with the next record's sequence, returning `false` at EOF.
    pub fn next_record(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        match self.records.next() {
            Some(rec) => {
                let seq = rec.map_err(|e| Error::CorruptRecord(e.to_string()))?;
                buf.clear();
                buf.extend_from_slice(&seq);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
