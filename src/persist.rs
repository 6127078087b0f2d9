//! Counter record binary persistence (§6): a self-describing blob of magic,
//! version, and fixed-width fields, transparently gzip-wrapped when the
//! destination path ends in `.gz`.

use crate::counter::vector::{CountVector, SaturatingCounter};
use crate::error::{Error, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"KMK1";
const VERSION: u16 = 1;

/// Everything persisted for one counter: its shape plus the raw count
/// vector cells (caller supplies/consumes the CBF banks separately, since
/// those are a query-time accelerator, not part of the record contract).
pub struct CounterRecord<E: SaturatingCounter> {
    pub k: u8,
    pub canonical: bool,
    pub t: u32,
    pub counts: CountVector<E>,
}

fn is_gz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

impl<E: SaturatingCounter> CounterRecord<E> {
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        if is_gz(path) {
            let mut w = GzEncoder::new(BufWriter::new(file), Compression::default());
            self.write_to(&mut w)?;
            w.finish()?;
        } else {
            let mut w = BufWriter::new(file);
            self.write_to(&mut w)?;
        }
        Ok(())
    }

    fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&VERSION.to_le_bytes())?;
        w.write_all(&[self.k])?;
        w.write_all(&[self.canonical as u8])?;
        w.write_all(&self.t.to_le_bytes())?;
        let m = self.counts.len() as u64;
        w.write_all(&m.to_le_bytes())?;
        for &cell in self.counts.iter() {
            w.write_all(&cell.to_u64().to_le_bytes())?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        if is_gz(path) {
            let mut r = BufReader::new(MultiGzDecoder::new(file));
            Self::read_from(&mut r)
        } else {
            let mut r = BufReader::new(file);
            Self::read_from(&mut r)
        }
    }

    fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)
            .map_err(|_| Error::CorruptRecord("truncated header".into()))?;
        if &magic != MAGIC {
            return Err(Error::CorruptRecord(format!(
                "bad magic {magic:?}, expected {MAGIC:?}"
            )));
        }

        let mut u16_buf = [0u8; 2];
        r.read_exact(&mut u16_buf)
            .map_err(|_| Error::CorruptRecord("truncated version".into()))?;
        let version = u16::from_le_bytes(u16_buf);
        if version != VERSION {
            return Err(Error::CorruptRecord(format!(
                "unsupported version {version}, expected {VERSION}"
            )));
        }

        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)
            .map_err(|_| Error::CorruptRecord("truncated k".into()))?;
        let k = byte[0];

        r.read_exact(&mut byte)
            .map_err(|_| Error::CorruptRecord("truncated canonical flag".into()))?;
        let canonical = byte[0] != 0;

        let mut u32_buf = [0u8; 4];
        r.read_exact(&mut u32_buf)
            .map_err(|_| Error::CorruptRecord("truncated t".into()))?;
        let t = u32::from_le_bytes(u32_buf);

        let mut u64_buf = [0u8; 8];
        r.read_exact(&mut u64_buf)
            .map_err(|_| Error::CorruptRecord("truncated m".into()))?;
        let m = u64::from_le_bytes(u64_buf) as usize;

        let mut cells = Vec::with_capacity(m);
        for _ in 0..m {
            r.read_exact(&mut u64_buf)
                .map_err(|_| Error::CorruptRecord("truncated counts".into()))?;
            cells.push(E::from_u64(u64::from_le_bytes(u64_buf)));
        }

        Ok(CounterRecord {
            k,
            canonical,
            t,
            counts: CountVector::from_cells(cells),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CounterRecord<u8> {
        let mut counts: CountVector<u8> = CountVector::new(16);
        counts.increment(3);
        counts.increment(3);
        counts.increment(9);
        CounterRecord {
            k: 4,
            canonical: true,
            t: 0,
            counts,
        }
    }

    #[test]
    fn save_load_round_trip_plain() {
        let tmp = tempfile::Builder::new().suffix(".kmr").tempfile().unwrap();
        let record = sample_record();
        record.save(tmp.path()).unwrap();
        let loaded: CounterRecord<u8> = CounterRecord::load(tmp.path()).unwrap();
        assert_eq!(loaded.k, record.k);
        assert_eq!(loaded.canonical, record.canonical);
        assert_eq!(loaded.t, record.t);
        assert_eq!(loaded.counts.as_slice(), record.counts.as_slice());
    }

    #[test]
    fn save_load_round_trip_gzipped() {
        let tmp = tempfile::Builder::new()
            .suffix(".kmr.gz")
            .tempfile()
            .unwrap();
        let record = sample_record();
        record.save(tmp.path()).unwrap();
        let loaded: CounterRecord<u8> = CounterRecord::load(tmp.path()).unwrap();
        assert_eq!(loaded.counts.as_slice(), record.counts.as_slice());
    }

    #[test]
    fn rejects_bad_magic() {
        let tmp = tempfile::Builder::new().suffix(".kmr").tempfile().unwrap();
        std::fs::write(tmp.path(), b"NOPE0000000000").unwrap();
        let err = CounterRecord::<u8>::load(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::CorruptRecord(_)));
    }

    #[test]
    fn rejects_truncated_blob() {
        let tmp = tempfile::Builder::new().suffix(".kmr").tempfile().unwrap();
        std::fs::write(tmp.path(), MAGIC).unwrap();
        let err = CounterRecord::<u8>::load(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::CorruptRecord(_)));
    }
}
