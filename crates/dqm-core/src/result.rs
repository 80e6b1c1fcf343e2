//! Comparison result contract (numbers-first).
//!
//! A [`ComparisonResult`] is built once per comparator invocation and handed
//! to an external renderer and archiver. It carries everything needed to
//! redraw the comparison without recomputing it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `info` key: mean squared pull.
pub const INFO_CHI_SQUARED: &str = "Chi_Squared";
/// `info` key: largest absolute pull.
pub const INFO_MAX_PULL: &str = "Max_Pull_Val";
/// `info` key: two-sample KS statistic.
pub const INFO_KS: &str = "KS_Val";
/// `info` key: data entry count.
pub const INFO_DATA_ENTRIES: &str = "Data_Entries";
/// `info` key: reference entry count.
pub const INFO_REF_ENTRIES: &str = "Ref_Entries";

/// Archivable derived data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Artifact {
    /// Row-major grid; `None` marks an explicitly empty bin.
    Grid(Vec<Vec<Option<f64>>>),
    /// Flat numeric series.
    Series(Vec<f64>),
    /// Free-form text.
    Text(String),
}

/// Pull heatmap description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullMap {
    /// `values[y][x]`: pull clamped to `[-cap, cap]`, `None` where both
    /// input bins were empty.
    pub values: Vec<Vec<Option<f64>>>,
    /// One label per x bin.
    pub x_labels: Vec<String>,
    /// One label per y bin.
    pub y_labels: Vec<String>,
    /// Display clamp bound.
    pub cap: f64,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
}

/// Overlay of two normalized 1D distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Lower edge of every bin.
    pub bin_lows: Vec<f64>,
    /// Normalized data contents.
    pub data: Vec<f64>,
    /// Reference contents.
    pub reference: Vec<f64>,
    /// Legend entry for the data series.
    pub data_label: String,
    /// Legend entry for the reference series.
    pub ref_label: String,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
}

/// Renderable description of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plot {
    /// 2D pull map.
    PullMap(PullMap),
    /// 1D overlay.
    Overlay(Overlay),
}

/// Output of one comparator invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Name of the comparator that produced this result.
    pub comparator: String,
    /// Data histogram label.
    pub data_name: String,
    /// Reference histogram label.
    pub ref_name: String,
    /// Data run identifier.
    pub data_run: String,
    /// Reference run identifier.
    pub ref_run: String,
    /// Outlier verdict.
    pub is_outlier: bool,
    /// Named summary statistics.
    pub info: BTreeMap<String, f64>,
    /// Derived arrays and strings for archival.
    pub artifacts: Vec<Artifact>,
    /// Renderable description, if the comparator provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<Plot>,
}

impl ComparisonResult {
    /// Look up a summary statistic.
    pub fn info_value(&self, key: &str) -> Option<f64> {
        self.info.get(key).copied()
    }
}
