//! Per-bin asymmetric Poisson errors.

use dqm_core::Result;
use dqm_prob::poisson::{self, ONE_SIGMA_CL};

/// Lower and upper error of every bin of one histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct BinErrors {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BinErrors {
    /// 68.27% Poisson errors, treating each value as a Poisson mean.
    pub fn poisson(values: &[f64]) -> Result<Self> {
        Self::with_confidence(values, ONE_SIGMA_CL)
    }

    /// Poisson errors at an arbitrary central confidence level.
    pub fn with_confidence(values: &[f64], confidence: f64) -> Result<Self> {
        let mut lower = Vec::with_capacity(values.len());
        let mut upper = Vec::with_capacity(values.len());
        for &v in values {
            let (lo, hi) = poisson::errors(v, confidence)?;
            lower.push(lo);
            upper.push(hi);
        }
        Ok(Self { lower, upper })
    }

    /// Lower errors.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper errors.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// `true` if there are no bins.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

/// Errors for bin `i` facing each other across the observed difference:
/// when data lies below the reference, the data upper and reference lower
/// errors; otherwise the data lower and reference upper errors.
pub fn select(
    data_value: f64,
    ref_value: f64,
    data: &BinErrors,
    reference: &BinErrors,
    i: usize,
) -> (f64, f64) {
    if data_value < ref_value {
        (data.upper[i], reference.lower[i])
    } else {
        (data.lower[i], reference.upper[i])
    }
}
