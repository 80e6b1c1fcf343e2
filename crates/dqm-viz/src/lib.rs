//! # dqm-viz
//!
//! Visualization data artifacts for AutoDQM.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures built from comparison results. Drawing is
//! left to whatever consumes the JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Heatmap / bar-overlay figure descriptions.
pub mod figure;

/// Batch summary artifact (outliers first).
pub mod summary;

pub use figure::{Figure, Layout, Marker, Trace, figure_for};
pub use summary::{SummaryArtifact, SummaryEntry, SummaryMeta, summary_artifact};
