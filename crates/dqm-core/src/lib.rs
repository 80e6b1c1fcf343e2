//! # dqm-core
//!
//! Data model shared by the AutoDQM comparators: histograms and histogram
//! pairs, comparator options, the comparison result contract handed to
//! renderers and archivers, and the [`Comparator`] trait.
//!
//! Nothing in this crate touches the filesystem or the network.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use config::{ComparisonConfig, ComparisonConfigPatch, NormType};
pub use error::{Error, Result};
pub use result::{Artifact, ComparisonResult, Overlay, Plot, PullMap};
pub use traits::Comparator;
pub use types::{Axis, Dimensionality, Histogram, HistogramPair};

/// Crate version, reported in artifacts and by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
