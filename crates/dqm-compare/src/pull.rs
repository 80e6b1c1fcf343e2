//! Bin-wise pull comparator for 2D histograms and 2D profiles.
//!
//! The data histogram is normalized against the reference, every bin pair is
//! turned into a pull `(d - r) / sqrt(err_d^2 + err_r^2)` with asymmetric
//! Poisson errors, and the pair is flagged when the mean squared pull or the
//! largest absolute pull exceeds its threshold.

use std::collections::BTreeMap;

use dqm_core::result::{INFO_CHI_SQUARED, INFO_DATA_ENTRIES, INFO_MAX_PULL, INFO_REF_ENTRIES};
use dqm_core::{
    Artifact, Comparator, ComparisonConfig, ComparisonResult, HistogramPair, Plot, PullMap, Result,
};

use crate::bin_errors::{self, BinErrors};
use crate::normalize;

/// Registry name of the pull comparator.
pub const NAME: &str = "pull_values";

/// Pull between two bins, errors added in quadrature.
pub fn pull(bin1: f64, err1: f64, bin2: f64, err2: f64) -> f64 {
    (bin1 - bin2) / (err1 * err1 + err2 * err2).sqrt()
}

/// Numeric outcome of a pull comparison, before any labeling.
#[derive(Debug, Clone, PartialEq)]
pub struct PullSummary {
    /// `grid[y][x]`: clamped pull, `None` where both raw bins were 0.
    pub grid: Vec<Vec<Option<f64>>>,
    /// Mean squared pull over all bins.
    pub chi2: f64,
    /// Largest absolute pull.
    pub max_pull: f64,
}

/// Compute the pull grid and aggregate statistics for a 2D pair.
///
/// Returns `Ok(None)` unless both histograms are 2D or 2D profiles.
pub fn pull_summary(
    pair: &HistogramPair,
    config: &ComparisonConfig,
) -> Result<Option<PullSummary>> {
    let (data, reference) = (&pair.data_hist, &pair.ref_hist);
    if !data.dimensionality().is_2d() || !reference.dimensionality().is_2d() {
        return Ok(None);
    }
    config.validate()?;
    pair.check_shapes()?;

    let (n_x, n_y) = data.shape();
    let data_raw = data.comparison_values();
    let ref_raw = reference.comparison_values();

    let data_norm = normalize::normalize(data, reference, config.norm_type)?;
    let data_errs = BinErrors::poisson(&data_norm)?;
    let ref_errs = BinErrors::poisson(ref_raw)?;

    let cap = config.pull_cap;
    let mut grid = vec![vec![None; n_x]; n_y];
    let mut chi2 = 0.0;
    let mut max_pull: f64 = 0.0;
    for x in 0..n_x {
        for y in 0..n_y {
            let i = y * n_x + x;
            let (d, r) = (data_norm[i], ref_raw[i]);
            let (d_err, r_err) = bin_errors::select(d, r, &data_errs, &ref_errs, i);

            let p = if d_err == 0.0 && r_err == 0.0 { 0.0 } else { pull(d, d_err, r, r_err) };
            chi2 += p * p;
            max_pull = max_pull.max(p.abs());

            if data_raw[i] != 0.0 || ref_raw[i] != 0.0 {
                grid[y][x] = Some(p.clamp(-cap, cap));
            }
        }
    }
    chi2 /= (n_x * n_y) as f64;

    Ok(Some(PullSummary { grid, chi2, max_pull }))
}

/// Outlier verdict from the aggregate statistics.
pub fn is_outlier(config: &ComparisonConfig, data_entries: u64, chi2: f64, max_pull: f64) -> bool {
    config.is_eligible(data_entries) && (chi2 > config.chi2_cut || max_pull.abs() > config.pull_cut)
}

/// Run the pull comparison and build the full result.
pub fn pull_values(
    pair: &HistogramPair,
    config: &ComparisonConfig,
) -> Result<Option<ComparisonResult>> {
    let Some(summary) = pull_summary(pair, config)? else {
        tracing::trace!(comparator = NAME, data_name = %pair.data_name, "not applicable");
        return Ok(None);
    };
    let (data, reference) = (&pair.data_hist, &pair.ref_hist);
    let outlier = is_outlier(config, data.entries(), summary.chi2, summary.max_pull);

    tracing::debug!(
        comparator = NAME,
        data_name = %pair.data_name,
        chi2 = summary.chi2,
        max_pull = summary.max_pull,
        is_outlier = outlier,
        "pull comparison"
    );

    let mut info = BTreeMap::new();
    info.insert(INFO_CHI_SQUARED.to_string(), summary.chi2);
    info.insert(INFO_MAX_PULL.to_string(), summary.max_pull);
    info.insert(INFO_DATA_ENTRIES.to_string(), data.entries() as f64);
    info.insert(INFO_REF_ENTRIES.to_string(), reference.entries() as f64);

    let artifacts = vec![
        Artifact::Grid(summary.grid.clone()),
        Artifact::Text(data.entries().to_string()),
        Artifact::Text(reference.entries().to_string()),
    ];

    let y_axis = data.y_axis();
    let plot = PullMap {
        values: summary.grid,
        x_labels: data.x_axis().tick_labels(),
        y_labels: y_axis.map(|a| a.tick_labels()).unwrap_or_default(),
        cap: config.pull_cap,
        x_title: data.x_axis().title.clone(),
        y_title: y_axis.map(|a| a.title.clone()).unwrap_or_default(),
    };

    Ok(Some(ComparisonResult {
        comparator: NAME.to_string(),
        data_name: pair.data_name.clone(),
        ref_name: pair.ref_name.clone(),
        data_run: pair.data_run.clone(),
        ref_run: pair.ref_run.clone(),
        is_outlier: outlier,
        info,
        artifacts,
        plot: Some(Plot::PullMap(plot)),
    }))
}

/// [`Comparator`] wrapper around [`pull_values`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PullComparator;

impl Comparator for PullComparator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_applicable(&self, pair: &HistogramPair) -> bool {
        let (d, r) = pair.dimensionalities();
        d.is_2d() && r.is_2d()
    }

    fn compare(
        &self,
        pair: &HistogramPair,
        config: &ComparisonConfig,
    ) -> Result<Option<ComparisonResult>> {
        pull_values(pair, config)
    }
}
