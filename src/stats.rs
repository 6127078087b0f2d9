//! Statistics stage (component I): per-sample L1 normalisation, row
//! centring/scaling, non-finite scrubbing, then sample-by-sample covariance
//! and Pearson correlation.

use crate::error::Result;
use crate::matrix;
use ndarray::{Array2, Axis};
use std::io::Write;
use std::path::PathBuf;

/// Divide each column by its L1 norm (sum of absolute values).
pub fn l1_normalise(counts: &Array2<f32>) -> Array2<f32> {
    let mut f = counts.clone();
    for mut col in f.columns_mut() {
        let l1: f32 = col.iter().map(|v| v.abs()).sum();
        if l1 > 0.0 {
            col /= l1;
        }
    }
    f
}

/// Subtract each row's mean, then divide by each row's sample (N-1)
/// standard deviation, scrubbing any resulting non-finite entry to 0.
pub fn centre_and_scale(f: &Array2<f32>) -> Array2<f32> {
    let mut scaled = f.clone();
    let (nrows, ncols) = scaled.dim();

    for r in 0..nrows {
        let mut row = scaled.row_mut(r);
        let mean: f32 = row.sum() / ncols as f32;
        row.mapv_inplace(|v| v - mean);

        if ncols > 1 {
            let var: f32 = row.iter().map(|v| v * v).sum::<f32>() / (ncols as f32 - 1.0);
            let std = var.sqrt();
            if std > 0.0 {
                row.mapv_inplace(|v| v / std);
            }
        }
    }

    scaled.mapv_inplace(|v| if v.is_finite() { v } else { 0.0 });
    scaled
}

/// Sample-by-sample covariance of the centred/scaled matrix's columns:
/// `cov[i][j] = sum_r(scaled[r,i] * scaled[r,j]) / (nrows - 1)`.
pub fn covariance(scaled: &Array2<f32>) -> Array2<f32> {
    let (nrows, ncols) = scaled.dim();
    let mut cov = Array2::zeros((ncols, ncols));
    let denom = if nrows > 1 { nrows as f32 - 1.0 } else { 1.0 };

    for i in 0..ncols {
        let col_i = scaled.column(i);
        for j in i..ncols {
            let col_j = scaled.column(j);
            let dot: f32 = col_i.iter().zip(col_j.iter()).map(|(a, b)| a * b).sum();
            let v = dot / denom;
            cov[[i, j]] = v;
            cov[[j, i]] = v;
        }
    }
    cov
}

/// Pearson correlation derived from the covariance matrix:
/// `corr[i][j] = cov[i][j] / sqrt(cov[i][i] * cov[j][j])`, scrubbing
/// non-finite results (zero-variance samples) to 0.
pub fn correlation(cov: &Array2<f32>) -> Array2<f32> {
    let ncols = cov.nrows();
    let std: Vec<f32> = (0..ncols).map(|i| cov[[i, i]].sqrt()).collect();
    let mut corr = Array2::zeros((ncols, ncols));
    for i in 0..ncols {
        for j in 0..ncols {
            let denom = std[i] * std[j];
            let v = if denom > 0.0 { cov[[i, j]] / denom } else { 0.0 };
            corr[[i, j]] = if v.is_finite() { v } else { 0.0 };
        }
    }
    corr
}

/// Run the full stage over `counts` and persist
/// `{basename}.scaledcounts` (binary matrix), `{basename}.covar` and
/// `{basename}.cor` (ASCII CSV).
pub fn run(counts: &Array2<f32>, basename: &str) -> Result<()> {
    log::info!("normalise, scale and centre counts...");
    let f = l1_normalise(counts);
    let scaled = centre_and_scale(&f);
    matrix::save(&PathBuf::from(format!("{basename}.scaledcounts")), &scaled)?;

    log::info!("computing covariance matrix...");
    let cov = covariance(&scaled);
    write_csv(&PathBuf::from(format!("{basename}.covar")), &cov)?;

    log::info!("computing correlation matrix...");
    let corr = correlation(&cov);
    write_csv(&PathBuf::from(format!("{basename}.cor")), &corr)?;

    Ok(())
}

fn write_csv(path: &std::path::Path, m: &Array2<f32>) -> Result<()> {
    let mut w = std::io::BufWriter::new(std::fs::File::create(path)?);
    for row in m.rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(w, "{line}")?;
    }
    Ok(())
}
