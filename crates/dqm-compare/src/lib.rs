//! # dqm-compare
//!
//! Statistical comparators between a data and a reference detector
//! histogram:
//!
//! - [`pull`]: bin-wise pulls with asymmetric Poisson errors (2D, profile 2D)
//! - [`ks`]: Kolmogorov–Smirnov statistic on normalized bin contents (1D)
//!
//! plus the [`normalize`] and [`bin_errors`] building blocks and a
//! [`ComparatorRegistry`] for dispatch by name.
//!
//! All functions are pure: inputs are copied before normalization and no
//! state survives an invocation, so pairs can be compared in parallel freely.

pub mod bin_errors;
pub mod ks;
pub mod normalize;
pub mod pull;
pub mod registry;

pub use bin_errors::BinErrors;
pub use ks::{KsComparator, ks_test};
pub use pull::{PullComparator, pull_values};
pub use registry::ComparatorRegistry;
