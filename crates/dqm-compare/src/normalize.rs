//! Rescaling of the data histogram against the reference.
//!
//! Every function returns a fresh array; inputs are never modified.

use dqm_core::{Error, Histogram, NormType, Result};

/// Scale every bin by `ref_entries / data_entries`. Data with zero entries
/// is returned unscaled.
pub fn global(data: &[f64], data_entries: u64, ref_entries: u64) -> Vec<f64> {
    if data_entries == 0 {
        return data.to_vec();
    }
    let scale = ref_entries as f64 / data_entries as f64;
    data.iter().map(|v| v * scale).collect()
}

/// Scale factor for one row given the data and reference row sums.
///
/// A zero data row sum takes the reference row sum as the scale (or 1 when
/// that is not positive); a negative data row sum keeps the row as is; a
/// zero scale is clamped to 1 so a row is never scaled to all-zero.
pub fn row_scale(data_sum: f64, ref_sum: f64) -> f64 {
    let scale = if data_sum == 0.0 {
        if ref_sum > 0.0 { ref_sum } else { 1.0 }
    } else if data_sum > 0.0 {
        ref_sum / data_sum
    } else {
        1.0
    };
    if scale == 0.0 { 1.0 } else { scale }
}

/// Scale each row `y` of a row-major `n_x * n_y` grid independently so its
/// sum matches the reference row sum.
pub fn rows(data: &[f64], reference: &[f64], n_x: usize, n_y: usize) -> Result<Vec<f64>> {
    let n = n_x.checked_mul(n_y).unwrap_or(usize::MAX);
    if n_x == 0 || data.len() != n || reference.len() != n {
        return Err(Error::InvalidHistogram(format!(
            "row normalization expects {} bins ({} x {}), got data={} reference={}",
            n,
            n_x,
            n_y,
            data.len(),
            reference.len()
        )));
    }

    let mut out = data.to_vec();
    for (row, ref_row) in out.chunks_mut(n_x).zip(reference.chunks(n_x)) {
        let scale = row_scale(row.iter().sum(), ref_row.iter().sum());
        for v in row.iter_mut() {
            *v *= scale;
        }
    }
    Ok(out)
}

/// Comparison values of `data` rescaled against `reference` with the given
/// mode. Row mode requires 2D histograms.
pub fn normalize(data: &Histogram, reference: &Histogram, norm_type: NormType) -> Result<Vec<f64>> {
    match norm_type {
        NormType::All => {
            Ok(global(data.comparison_values(), data.entries(), reference.entries()))
        }
        NormType::Row => {
            if !data.dimensionality().is_2d() {
                return Err(Error::InvalidConfig(format!(
                    "row normalization needs a 2D histogram, '{}' is {:?}",
                    data.name(),
                    data.dimensionality()
                )));
            }
            let (n_x, n_y) = data.shape();
            rows(data.comparison_values(), reference.comparison_values(), n_x, n_y)
        }
    }
}
