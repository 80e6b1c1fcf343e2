//! Kolmogorov–Smirnov comparator for 1D histograms.
//!
//! The data histogram is normalized to the reference entry count, then the
//! two bin-content arrays are compared with the two-sample KS statistic.
//! Note that the bin *contents* are treated as the samples; this is not the
//! per-event KS test and ignores bin positions. It is kept for
//! compatibility with existing thresholds (`ks_cut`).

use std::collections::BTreeMap;

use dqm_core::result::{INFO_DATA_ENTRIES, INFO_KS, INFO_REF_ENTRIES};
use dqm_core::{
    Artifact, Comparator, ComparisonConfig, ComparisonResult, Dimensionality, HistogramPair,
    Overlay, Plot, Result,
};

use crate::normalize;

/// Registry name of the KS comparator.
pub const NAME: &str = "ks_test";

/// Normalized data, reference contents and their KS statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct KsSummary {
    /// Data contents scaled to the reference entry count.
    pub data_norm: Vec<f64>,
    /// Reference contents.
    pub ref_norm: Vec<f64>,
    /// Two-sample KS statistic of the two arrays.
    pub ks: f64,
}

/// Compute the KS statistic for a 1D pair. Returns `Ok(None)` unless both
/// histograms are 1D.
pub fn ks_summary(pair: &HistogramPair, config: &ComparisonConfig) -> Result<Option<KsSummary>> {
    if pair.dimensionalities() != (Dimensionality::OneD, Dimensionality::OneD) {
        return Ok(None);
    }
    config.validate()?;
    pair.check_shapes()?;

    let (data, reference) = (&pair.data_hist, &pair.ref_hist);
    let data_norm = normalize::global(data.content(), data.entries(), reference.entries());
    let ref_norm = reference.content().to_vec();
    let ks = dqm_prob::ks::two_sample_statistic(&ref_norm, &data_norm)?;

    Ok(Some(KsSummary { data_norm, ref_norm, ks }))
}

/// Outlier verdict for a KS statistic.
pub fn is_outlier(config: &ComparisonConfig, data_entries: u64, ks: f64) -> bool {
    config.is_eligible(data_entries) && ks > config.ks_cut
}

/// Run the KS comparison and build the full result.
pub fn ks_test(
    pair: &HistogramPair,
    config: &ComparisonConfig,
) -> Result<Option<ComparisonResult>> {
    let Some(summary) = ks_summary(pair, config)? else {
        tracing::trace!(comparator = NAME, data_name = %pair.data_name, "not applicable");
        return Ok(None);
    };
    let (data, reference) = (&pair.data_hist, &pair.ref_hist);
    let outlier = is_outlier(config, data.entries(), summary.ks);

    tracing::debug!(
        comparator = NAME,
        data_name = %pair.data_name,
        ks = summary.ks,
        is_outlier = outlier,
        "ks comparison"
    );

    let mut info = BTreeMap::new();
    info.insert(INFO_DATA_ENTRIES.to_string(), data.entries() as f64);
    info.insert(INFO_REF_ENTRIES.to_string(), reference.entries() as f64);
    info.insert(INFO_KS.to_string(), summary.ks);

    let data_label = format!("data:{}", pair.data_run);
    let ref_label = format!("ref:{}", pair.ref_run);

    let artifacts = vec![
        Artifact::Series(summary.data_norm.clone()),
        Artifact::Series(summary.ref_norm.clone()),
        Artifact::Text(data_label.clone()),
        Artifact::Text(ref_label.clone()),
    ];

    let plot = Overlay {
        bin_lows: data.x_axis().bin_lows(),
        data: summary.data_norm,
        reference: summary.ref_norm,
        data_label,
        ref_label,
        x_title: data.x_axis().title.clone(),
        y_title: String::new(),
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
        plot: Some(Plot::Overlay(plot)),
    }))
}

/// [`Comparator`] wrapper around [`ks_test`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KsComparator;

impl Comparator for KsComparator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_applicable(&self, pair: &HistogramPair) -> bool {
        pair.dimensionalities() == (Dimensionality::OneD, Dimensionality::OneD)
    }

    fn compare(
        &self,
        pair: &HistogramPair,
        config: &ComparisonConfig,
    ) -> Result<Option<ComparisonResult>> {
        ks_test(pair, config)
    }
}
