//! Histogram data model for AutoDQM
//!
//! Bin contents are stored row-major: for a 2D histogram with `n_x` columns
//! and `n_y` rows, bin `(x, y)` lives at `y * n_x + x`. A "row" is therefore
//! every `x` bin at a fixed `y`. 1D histograms are a single row.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Dimensionality tag carried by every histogram.
///
/// Comparators match on this tag to decide applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    /// One-dimensional histogram (TH1-like).
    #[serde(rename = "1d")]
    OneD,
    /// Two-dimensional count histogram (TH2-like).
    #[serde(rename = "2d")]
    TwoD,
    /// Two-dimensional profile: summed values plus per-bin entry counts.
    #[serde(rename = "profile_2d")]
    Profile2D,
}

impl Dimensionality {
    /// `true` for `TwoD` and `Profile2D`.
    pub fn is_2d(self) -> bool {
        matches!(self, Self::TwoD | Self::Profile2D)
    }
}

/// Uniformly binned axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis title.
    #[serde(default)]
    pub title: String,
    /// Number of bins (excluding under/overflow).
    pub n_bins: usize,
    /// Lower edge of first bin.
    pub min: f64,
    /// Upper edge of last bin.
    pub max: f64,
    /// Categorical bin labels, if the axis defines them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Axis {
    /// Untitled axis with `n_bins` equal-width bins on `[min, max)`.
    pub fn uniform(n_bins: usize, min: f64, max: f64) -> Self {
        Self { title: String::new(), n_bins, min, max, labels: None }
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Attach categorical bin labels.
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    fn validate(&self, which: &str) -> Result<()> {
        if self.n_bins == 0 {
            return Err(Error::InvalidHistogram(format!("{which} axis has no bins")));
        }
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(Error::InvalidHistogram(format!(
                "{which} axis bounds must be finite with min < max, got [{}, {}]",
                self.min, self.max
            )));
        }
        if let Some(labels) = &self.labels {
            if !labels.is_empty() && labels.len() != self.n_bins {
                return Err(Error::InvalidHistogram(format!(
                    "{which} axis has {} labels for {} bins",
                    labels.len(),
                    self.n_bins
                )));
            }
        }
        Ok(())
    }

    /// Width of a single bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.n_bins as f64
    }

    /// Lower edge of every bin.
    pub fn bin_lows(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..self.n_bins).map(|i| self.min + i as f64 * w).collect()
    }

    /// Display labels: the categorical labels when present, otherwise the
    /// lower bin edges formatted as numbers.
    pub fn tick_labels(&self) -> Vec<String> {
        match &self.labels {
            Some(labels) if !labels.is_empty() => labels.clone(),
            _ => self.bin_lows().into_iter().map(|v| format!("{:?}", v)).collect(),
        }
    }
}

/// Immutable histogram: bin contents, entry count, axes and a
/// dimensionality tag.
///
/// The shape is fixed at construction. Every constructor validates the
/// contents against the axes, so a `Histogram` value is always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistogramRepr", into = "HistogramRepr")]
pub struct Histogram {
    name: String,
    dimensionality: Dimensionality,
    x_axis: Axis,
    y_axis: Option<Axis>,
    content: Vec<f64>,
    bin_entries: Option<Vec<f64>>,
    entries: u64,
}

impl Histogram {
    /// 1D histogram.
    pub fn one_d(
        name: impl Into<String>,
        x_axis: Axis,
        content: Vec<f64>,
        entries: u64,
    ) -> Result<Self> {
        Self::build(name.into(), Dimensionality::OneD, x_axis, None, content, None, entries)
    }

    /// 2D count histogram; `content` is row-major (`y * n_x + x`).
    pub fn two_d(
        name: impl Into<String>,
        x_axis: Axis,
        y_axis: Axis,
        content: Vec<f64>,
        entries: u64,
    ) -> Result<Self> {
        Self::build(name.into(), Dimensionality::TwoD, x_axis, Some(y_axis), content, None, entries)
    }

    /// 2D profile histogram: per-bin value sums plus per-bin entry counts,
    /// both row-major.
    pub fn profile_2d(
        name: impl Into<String>,
        x_axis: Axis,
        y_axis: Axis,
        sums: Vec<f64>,
        bin_entries: Vec<f64>,
        entries: u64,
    ) -> Result<Self> {
        Self::build(
            name.into(),
            Dimensionality::Profile2D,
            x_axis,
            Some(y_axis),
            sums,
            Some(bin_entries),
            entries,
        )
    }

    fn build(
        name: String,
        dimensionality: Dimensionality,
        x_axis: Axis,
        y_axis: Option<Axis>,
        content: Vec<f64>,
        bin_entries: Option<Vec<f64>>,
        entries: u64,
    ) -> Result<Self> {
        x_axis.validate("x")?;
        let n_y = match (dimensionality.is_2d(), &y_axis) {
            (true, Some(y)) => {
                y.validate("y")?;
                y.n_bins
            }
            (true, None) => {
                return Err(Error::InvalidHistogram(format!(
                    "histogram '{name}' is 2D but has no y axis"
                )));
            }
            (false, Some(_)) => {
                return Err(Error::InvalidHistogram(format!(
                    "histogram '{name}' is 1D but has a y axis"
                )));
            }
            (false, None) => 1,
        };

        let n_cells = x_axis.n_bins.checked_mul(n_y).ok_or_else(|| {
            Error::InvalidHistogram(format!("histogram '{name}' has too many bins"))
        })?;
        if content.len() != n_cells {
            return Err(Error::InvalidHistogram(format!(
                "histogram '{name}' has {} bin contents, expected {} ({} x {})",
                content.len(),
                n_cells,
                x_axis.n_bins,
                n_y
            )));
        }
        if let Some(i) = content.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidHistogram(format!(
                "histogram '{name}' has non-finite content in bin {i}"
            )));
        }

        match (dimensionality, &bin_entries) {
            (Dimensionality::Profile2D, Some(be)) => {
                if be.len() != n_cells {
                    return Err(Error::InvalidHistogram(format!(
                        "profile '{name}' has {} bin entry counts, expected {}",
                        be.len(),
                        n_cells
                    )));
                }
                if let Some(i) = be.iter().position(|v| !v.is_finite() || *v < 0.0) {
                    return Err(Error::InvalidHistogram(format!(
                        "profile '{name}' has an invalid entry count in bin {i}"
                    )));
                }
            }
            (Dimensionality::Profile2D, None) => {
                return Err(Error::InvalidHistogram(format!(
                    "profile '{name}' is missing per-bin entry counts"
                )));
            }
            (_, Some(_)) => {
                return Err(Error::InvalidHistogram(format!(
                    "histogram '{name}' carries per-bin entry counts but is not a profile"
                )));
            }
            (_, None) => {}
        }

        Ok(Self { name, dimensionality, x_axis, y_axis, content, bin_entries, entries })
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimensionality tag.
    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// X axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// Y axis (2D and profiles only).
    pub fn y_axis(&self) -> Option<&Axis> {
        self.y_axis.as_ref()
    }

    /// Bin contents, row-major. For profiles these are the value sums.
    pub fn content(&self) -> &[f64] {
        &self.content
    }

    /// Per-bin entry counts (profiles only).
    pub fn bin_entries(&self) -> Option<&[f64]> {
        self.bin_entries.as_deref()
    }

    /// Total number of entries, independent of any normalization.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// `(n_x, n_y)`; `n_y` is 1 for 1D histograms.
    pub fn shape(&self) -> (usize, usize) {
        (self.x_axis.n_bins, self.y_axis.as_ref().map_or(1, |a| a.n_bins))
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Always `false`: construction rejects empty axes.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Values a count-based comparison should use: the per-bin entry
    /// counts for profiles, the bin contents otherwise.
    pub fn comparison_values(&self) -> &[f64] {
        match (&self.dimensionality, &self.bin_entries) {
            (Dimensionality::Profile2D, Some(be)) => be,
            _ => &self.content,
        }
    }
}

/// Serialized form of a [`Histogram`]. Entry counts arrive as JSON numbers
/// and are checked before conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistogramRepr {
    #[serde(default)]
    name: String,
    kind: Dimensionality,
    x_axis: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y_axis: Option<Axis>,
    content: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bin_entries: Option<Vec<f64>>,
    entries: f64,
}

impl TryFrom<HistogramRepr> for Histogram {
    type Error = Error;

    fn try_from(r: HistogramRepr) -> Result<Self> {
        if !r.entries.is_finite() || r.entries < 0.0 || r.entries.fract() != 0.0 {
            return Err(Error::InvalidHistogram(format!(
                "histogram '{}' entry count must be a non-negative integer, got {}",
                r.name, r.entries
            )));
        }
        if r.entries > u64::MAX as f64 {
            return Err(Error::InvalidHistogram(format!(
                "histogram '{}' entry count {} is out of range",
                r.name, r.entries
            )));
        }
        Self::build(r.name, r.kind, r.x_axis, r.y_axis, r.content, r.bin_entries, r.entries as u64)
    }
}

impl From<Histogram> for HistogramRepr {
    fn from(h: Histogram) -> Self {
        Self {
            name: h.name,
            kind: h.dimensionality,
            x_axis: h.x_axis,
            y_axis: h.y_axis,
            content: h.content,
            bin_entries: h.bin_entries,
            entries: h.entries as f64,
        }
    }
}

/// Data histogram, reference histogram and the identifiers used to label
/// the comparison. The identifiers never influence the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramPair {
    /// Label for the data histogram.
    #[serde(default)]
    pub data_name: String,
    /// Label for the reference histogram.
    #[serde(default)]
    pub ref_name: String,
    /// Data run identifier.
    #[serde(default)]
    pub data_run: String,
    /// Reference run identifier.
    #[serde(default)]
    pub ref_run: String,
    /// Histogram under test.
    #[serde(rename = "data")]
    pub data_hist: Histogram,
    /// Reference histogram.
    #[serde(rename = "reference")]
    pub ref_hist: Histogram,
}

impl HistogramPair {
    /// Pair named after the histograms themselves, with empty run labels.
    pub fn new(data_hist: Histogram, ref_hist: Histogram) -> Self {
        Self {
            data_name: data_hist.name().to_string(),
            ref_name: ref_hist.name().to_string(),
            data_run: String::new(),
            ref_run: String::new(),
            data_hist,
            ref_hist,
        }
    }

    /// Set the run identifiers.
    pub fn with_runs(mut self, data_run: impl Into<String>, ref_run: impl Into<String>) -> Self {
        self.data_run = data_run.into();
        self.ref_run = ref_run.into();
        self
    }

    /// `(data, reference)` dimensionality tags.
    pub fn dimensionalities(&self) -> (Dimensionality, Dimensionality) {
        (self.data_hist.dimensionality(), self.ref_hist.dimensionality())
    }

    /// Fail with [`Error::InvalidHistogram`] unless data and reference have
    /// the same bin layout.
    pub fn check_shapes(&self) -> Result<()> {
        let (d, r) = (self.data_hist.shape(), self.ref_hist.shape());
        if d != r {
            return Err(Error::InvalidHistogram(format!(
                "shape mismatch between data '{}' {:?} and reference '{}' {:?}",
                self.data_name, d, self.ref_name, r
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(n: usize) -> Axis {
        Axis::uniform(n, 0.0, n as f64)
    }

    #[test]
    fn test_two_d_shape_and_layout() {
        let h = Histogram::two_d("h", axis(3), axis(2), vec![0., 1., 2., 3., 4., 5.], 15).unwrap();
        assert_eq!(h.shape(), (3, 2));
        assert_eq!(h.len(), 6);
        assert_eq!(h.entries(), 15);
        assert_eq!(h.comparison_values(), h.content());
    }

    #[test]
    fn test_content_length_mismatch_is_invalid() {
        let err = Histogram::two_d("h", axis(2), axis(2), vec![1.0; 3], 3).unwrap_err();
        assert!(matches!(err, Error::InvalidHistogram(_)));
    }

    #[test]
    fn test_non_finite_content_is_invalid() {
        let err = Histogram::one_d("h", axis(2), vec![1.0, f64::NAN], 1).unwrap_err();
        assert!(matches!(err, Error::InvalidHistogram(_)));
    }

    #[test]
    fn test_empty_or_inverted_axis_is_invalid() {
        assert!(Histogram::one_d("h", Axis::uniform(0, 0.0, 1.0), vec![], 0).is_err());
        assert!(Histogram::one_d("h", Axis::uniform(1, 1.0, 0.0), vec![1.0], 1).is_err());
    }

    #[test]
    fn test_one_d_rejects_y_axis_and_two_d_requires_it() {
        assert!(Histogram::build(
            "h".into(),
            Dimensionality::OneD,
            axis(1),
            Some(axis(1)),
            vec![1.0],
            None,
            1
        )
        .is_err());
        assert!(Histogram::build(
            "h".into(),
            Dimensionality::TwoD,
            axis(1),
            None,
            vec![1.0],
            None,
            1
        )
        .is_err());
    }

    #[test]
    fn test_profile_uses_bin_entries_for_comparison() {
        let h = Histogram::profile_2d(
            "p",
            axis(2),
            axis(1),
            vec![10.5, 3.25],
            vec![4.0, 2.0],
            6,
        )
        .unwrap();
        assert_eq!(h.comparison_values(), &[4.0, 2.0]);
        assert_eq!(h.content(), &[10.5, 3.25]);
    }

    #[test]
    fn test_profile_bin_entries_shape_checked() {
        let err =
            Histogram::profile_2d("p", axis(2), axis(1), vec![1.0, 1.0], vec![1.0], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidHistogram(_)));
    }

    #[test]
    fn test_label_count_checked() {
        let x = axis(3).with_labels(["a", "b"]);
        assert!(Histogram::one_d("h", x, vec![1.0; 3], 3).is_err());
    }

    #[test]
    fn test_tick_labels_numeric_and_categorical() {
        let a = Axis::uniform(4, 0.0, 2.0);
        assert_eq!(a.tick_labels(), vec!["0.0", "0.5", "1.0", "1.5"]);
        let b = Axis::uniform(2, 0.0, 2.0).with_labels(["ME+1/1", "ME+1/2"]);
        assert_eq!(b.tick_labels(), vec!["ME+1/1", "ME+1/2"]);
    }

    #[test]
    fn test_json_roundtrip_and_validation() {
        let json = r#"{
            "name": "hSnhits",
            "kind": "1d",
            "x_axis": {"title": "n hits", "n_bins": 3, "min": 0.0, "max": 3.0},
            "content": [10, 20, 10],
            "entries": 40
        }"#;
        let h: Histogram = serde_json::from_str(json).unwrap();
        assert_eq!(h.dimensionality(), Dimensionality::OneD);
        assert_eq!(h.entries(), 40);
        assert_eq!(h.x_axis().title, "n hits");

        let back: Histogram = serde_json::from_str(&serde_json::to_string(&h).unwrap()).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn test_json_negative_entries_rejected() {
        let json = r#"{
            "kind": "1d",
            "x_axis": {"n_bins": 1, "min": 0.0, "max": 1.0},
            "content": [1],
            "entries": -5
        }"#;
        let err = serde_json::from_str::<Histogram>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid histogram"), "{}", err);
    }

    #[test]
    fn test_pair_shape_check() {
        let d = Histogram::one_d("d", axis(3), vec![1.0; 3], 3).unwrap();
        let r = Histogram::one_d("r", axis(4), vec![1.0; 4], 4).unwrap();
        let pair = HistogramPair::new(d.clone(), r).with_runs("300811", "301531");
        assert_eq!(pair.data_name, "d");
        assert_eq!(pair.ref_run, "301531");
        assert!(matches!(pair.check_shapes(), Err(Error::InvalidHistogram(_))));
        assert!(HistogramPair::new(d.clone(), d).check_shapes().is_ok());
    }
}
