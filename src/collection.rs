//! Sample collection (component H): loads many persisted counters in
//! parallel into a dense rows-by-samples matrix, caches it on disk, and
//! hands it to the statistics stage.

use crate::counter::kmer_counter::KmerCounter;
use crate::counter::vector::SaturatingCounter;
use crate::error::Result;
use crate::matrix;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use rayon::prelude::*;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// `top_n` rows, one column per sample, populated either by loading a
/// previously saved collection or by building one from counter files.
pub struct SampleCollection {
    top_n: usize,
    names: Vec<String>,
    counts: Array2<f32>,
}

/// Strip a trailing `.gz`, then a trailing `.kmr`, each at most once, and
/// drop any directory component — spec.md §3/§4.H's sample-name rule.
pub fn normalise_samplename(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stripped_gz = file_name
        .strip_suffix(".gz")
        .unwrap_or(&file_name);
    let stripped_kmr = stripped_gz.strip_suffix(".kmr").unwrap_or(stripped_gz);
    stripped_kmr.to_string()
}

impl SampleCollection {
    pub fn new(top_n: usize) -> Self {
        SampleCollection {
            top_n,
            names: Vec::new(),
            counts: Array2::zeros((top_n, 0)),
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn counts(&self) -> &Array2<f32> {
        &self.counts
    }

    /// Attempt to load a previously persisted collection. Returns `Ok(true)`
    /// on success; any shape or name-list mismatch is a soft failure
    /// (`Ok(false)`), leaving the caller to rebuild from scratch. `Io` and
    /// `CorruptRecord` from the underlying loads still propagate as `Err`.
    pub fn load(&mut self, basename: &str, expected: &[PathBuf]) -> Result<bool> {
        let counts_path = PathBuf::from(format!("{basename}.counts"));
        let samples_path = PathBuf::from(format!("{basename}.samples"));
        if !counts_path.exists() || !samples_path.exists() {
            return Ok(false);
        }

        let counts = matrix::load(&counts_path)?;
        if counts.nrows() != self.top_n {
            log::warn!(
                "{basename}: cached collection has {} rows, expected top_n={}",
                counts.nrows(),
                self.top_n
            );
            return Ok(false);
        }

        let names = read_names(&samples_path)?;
        if names.len() != counts.ncols() {
            log::warn!(
                "{basename}: {} sample names but {} matrix columns",
                names.len(),
                counts.ncols()
            );
            return Ok(false);
        }

        if !expected.is_empty() {
            let expected_names: Vec<String> =
                expected.iter().map(|p| normalise_samplename(p)).collect();
            if expected_names.len() != counts.ncols() || expected_names != names {
                log::warn!("{basename}: cached sample list does not match the requested files");
                return Ok(false);
            }
        }

        self.names = names;
        self.counts = counts;
        Ok(true)
    }

    /// Build the collection from scratch: load each counter file in
    /// parallel, writing disjoint columns/name slots, then save.
    pub fn add_samples<E: SaturatingCounter>(&mut self, files: &[PathBuf]) -> Result<()> {
        let nsamples = files.len();
        self.names = vec![String::new(); nsamples];
        self.counts = Array2::zeros((self.top_n, nsamples));

        let pb = ProgressBar::new(nsamples as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("       {bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        let log_lock = Mutex::new(());

        let top_n = self.top_n;
        let columns: Vec<Result<(usize, String, Vec<f32>)>> = files
            .par_iter()
            .enumerate()
            .map(|(j, path)| -> Result<(usize, String, Vec<f32>)> {
                let counter: KmerCounter<E> = KmerCounter::load(path)?;
                let n = top_n.min(counter.counts().len());
                let mut column = vec![0.0f32; top_n];
                for (i, cell) in counter.counts().iter().take(n).enumerate() {
                    column[i] = cell.to_u64() as f32;
                }
                let name = normalise_samplename(path);

                {
                    let _guard = log_lock.lock().unwrap();
                    log::info!("loaded sample {name} ({j}/{nsamples})");
                    pb.inc(1);
                }

                Ok((j, name, column))
            })
            .collect();

        for result in columns {
            let (j, name, column) = result?;
            self.names[j] = name;
            self.counts.column_mut(j).assign(&ndarray::Array1::from(column));
        }

        pb.finish_with_message("| Finished loading samples");
        Ok(())
    }

    /// Persist the matrix and write the name list, one per line, in column
    /// order.
    pub fn save(&self, basename: &str) -> Result<()> {
        matrix::save(&PathBuf::from(format!("{basename}.counts")), &self.counts)?;

        let mut w = BufWriter::new(std::fs::File::create(format!("{basename}.samples"))?);
        for name in &self.names {
            writeln!(w, "{name}")?;
        }
        Ok(())
    }
}

fn read_names(path: &Path) -> Result<Vec<String>> {
    let r = BufReader::new(std::fs::File::open(path)?);
    let mut names = Vec::new();
    for line in r.lines() {
        names.push(line?);
    }
    Ok(names)
}
