//! Core traits for AutoDQM
//!
//! A [`Comparator`] is a pure function from a histogram pair plus options to
//! a comparison result. Drivers hold comparators behind `dyn Comparator` so
//! they can sweep every registered comparator over pairs of any
//! dimensionality.

use crate::{ComparisonConfig, ComparisonResult, HistogramPair, Result};

/// Statistical comparator between a data and a reference histogram.
pub trait Comparator: Send + Sync {
    /// Registry name (e.g. `"pull_values"`).
    fn name(&self) -> &'static str;

    /// Whether both histograms of the pair have a dimensionality this
    /// comparator understands.
    fn is_applicable(&self, pair: &HistogramPair) -> bool;

    /// Run the comparison.
    ///
    /// Returns `Ok(None)` when the pair is not applicable. That is an
    /// expected outcome, not an error.
    fn compare(
        &self,
        pair: &HistogramPair,
        config: &ComparisonConfig,
    ) -> Result<Option<ComparisonResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Axis, Dimensionality, Histogram};
    use std::collections::BTreeMap;

    struct OneDOnly;

    impl Comparator for OneDOnly {
        fn name(&self) -> &'static str {
            "one_d_only"
        }

        fn is_applicable(&self, pair: &HistogramPair) -> bool {
            pair.dimensionalities() == (Dimensionality::OneD, Dimensionality::OneD)
        }

        fn compare(
            &self,
            pair: &HistogramPair,
            _config: &ComparisonConfig,
        ) -> Result<Option<ComparisonResult>> {
            if !self.is_applicable(pair) {
                return Ok(None);
            }
            Ok(Some(ComparisonResult {
                comparator: self.name().to_string(),
                data_name: pair.data_name.clone(),
                ref_name: pair.ref_name.clone(),
                data_run: pair.data_run.clone(),
                ref_run: pair.ref_run.clone(),
                is_outlier: false,
                info: BTreeMap::new(),
                artifacts: vec![],
                plot: None,
            }))
        }
    }

    #[test]
    fn test_dyn_comparator_not_applicable() {
        let h = Histogram::two_d(
            "h",
            Axis::uniform(2, 0.0, 2.0),
            Axis::uniform(1, 0.0, 1.0),
            vec![1.0, 2.0],
            3,
        )
        .unwrap();
        let pair = HistogramPair::new(h.clone(), h);
        let c: Box<dyn Comparator> = Box::new(OneDOnly);
        assert_eq!(c.name(), "one_d_only");
        assert!(c.compare(&pair, &ComparisonConfig::default()).unwrap().is_none());
    }
}
