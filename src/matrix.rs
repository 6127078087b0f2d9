//! Self-describing binary matrix persistence (§6), standing in for the
//! armadillo `hdf5_binary_trans` saver the original tool uses: any
//! self-describing row-by-column binary format suffices as long as
//! dimensions are recoverable from the blob itself.

use crate::error::{Error, Result};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"KMAT";

pub fn save(path: &Path, matrix: &Array2<f32>) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(MAGIC)?;
    w.write_all(&(matrix.nrows() as u64).to_le_bytes())?;
    w.write_all(&(matrix.ncols() as u64).to_le_bytes())?;
    for &v in matrix.iter() {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<Array2<f32>> {
    let mut r = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)
        .map_err(|_| Error::CorruptRecord("truncated matrix header".into()))?;
    if &magic != MAGIC {
        return Err(Error::CorruptRecord(format!(
            "bad matrix magic {magic:?}, expected {MAGIC:?}"
        )));
    }

    let mut u64_buf = [0u8; 8];
    r.read_exact(&mut u64_buf)
        .map_err(|_| Error::CorruptRecord("truncated row count".into()))?;
    let rows = u64::from_le_bytes(u64_buf) as usize;

    r.read_exact(&mut u64_buf)
        .map_err(|_| Error::CorruptRecord("truncated col count".into()))?;
    let cols = u64::from_le_bytes(u64_buf) as usize;

    let mut data = Vec::with_capacity(rows * cols);
    let mut f32_buf = [0u8; 4];
    for _ in 0..(rows * cols) {
        r.read_exact(&mut f32_buf)
            .map_err(|_| Error::CorruptRecord("truncated matrix body".into()))?;
        data.push(f32::from_le_bytes(f32_buf));
    }

    Array2::from_shape_vec((rows, cols), data)
        .map_err(|e| Error::CorruptRecord(format!("inconsistent matrix shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn round_trips_shape_and_values() {
        let m = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let tmp = tempfile::NamedTempFile::new().unwrap();
        save(tmp.path(), &m).unwrap();
        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn rejects_bad_magic() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), b"NOPE0000000000000000").unwrap();
        let err = load(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::CorruptRecord(_)));
    }
}
