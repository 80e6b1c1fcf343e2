//! Probability building blocks for AutoDQM.
//!
//! - Poisson confidence intervals from chi-square quantiles (per-bin errors)
//! - two-sample Kolmogorov–Smirnov statistic

pub mod ks;
pub mod poisson;
