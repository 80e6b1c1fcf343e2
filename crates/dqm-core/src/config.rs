//! Comparator options.
//!
//! A flat option bag: every comparator reads the options it knows and
//! ignores the rest. Missing options take the defaults below.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How the data histogram is rescaled before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormType {
    /// Scale by the ratio of total entry counts.
    #[default]
    All,
    /// Scale each row independently by the ratio of row sums (2D only).
    Row,
}

/// Options recognized by the built-in comparators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Max-pull outlier threshold.
    pub pull_cut: f64,
    /// Aggregate chi-square outlier threshold.
    pub chi2_cut: f64,
    /// Clamp bound for the displayed pull values.
    pub pull_cap: f64,
    /// Normalization mode for the pull comparator.
    pub norm_type: NormType,
    /// KS-statistic outlier threshold.
    pub ks_cut: f64,
    /// Minimum data entries for a pair to be outlier-eligible.
    pub min_entries: u64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            pull_cut: 20.0,
            chi2_cut: 500.0,
            pull_cap: 25.0,
            norm_type: NormType::All,
            ks_cut: 0.09,
            min_entries: 100_000,
        }
    }
}

impl ComparisonConfig {
    /// Check every threshold is finite and in range.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in
            [("pull_cut", self.pull_cut), ("chi2_cut", self.chi2_cut), ("ks_cut", self.ks_cut)]
        {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        if !self.pull_cap.is_finite() || self.pull_cap <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "pull_cap must be finite and > 0, got {}",
                self.pull_cap
            )));
        }
        Ok(())
    }

    /// `true` if `data_entries` is large enough for the pair to be flagged.
    pub fn is_eligible(&self, data_entries: u64) -> bool {
        data_entries != 0 && data_entries >= self.min_entries
    }
}

/// Partial set of options layered over a base [`ComparisonConfig`], e.g.
/// per-histogram overrides in a run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfigPatch {
    /// Overrides [`ComparisonConfig::pull_cut`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_cut: Option<f64>,
    /// Overrides [`ComparisonConfig::chi2_cut`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chi2_cut: Option<f64>,
    /// Overrides [`ComparisonConfig::pull_cap`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_cap: Option<f64>,
    /// Overrides [`ComparisonConfig::norm_type`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm_type: Option<NormType>,
    /// Overrides [`ComparisonConfig::ks_cut`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ks_cut: Option<f64>,
    /// Overrides [`ComparisonConfig::min_entries`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_entries: Option<u64>,
}

impl ComparisonConfigPatch {
    /// `base` with every option set in this patch replaced.
    pub fn apply(&self, base: &ComparisonConfig) -> ComparisonConfig {
        ComparisonConfig {
            pull_cut: self.pull_cut.unwrap_or(base.pull_cut),
            chi2_cut: self.chi2_cut.unwrap_or(base.chi2_cut),
            pull_cap: self.pull_cap.unwrap_or(base.pull_cap),
            norm_type: self.norm_type.unwrap_or(base.norm_type),
            ks_cut: self.ks_cut.unwrap_or(base.ks_cut),
            min_entries: self.min_entries.unwrap_or(base.min_entries),
        }
    }
}
