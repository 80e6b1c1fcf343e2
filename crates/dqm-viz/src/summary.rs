//! Summary artifact for a batch of comparisons.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use dqm_core::{ComparisonResult, Error, Result};
use serde::Serialize;

/// Batch summary, one entry per comparison result.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryArtifact {
    /// Artifact schema identifier.
    pub schema_version: String,
    /// Provenance and counts.
    pub meta: SummaryMeta,
    /// Outliers first, then by histogram and comparator name.
    pub entries: Vec<SummaryEntry>,
}

/// Provenance and counts.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryMeta {
    /// Producing tool.
    pub tool: String,
    /// Producing tool version.
    pub tool_version: String,
    /// Creation time.
    pub created_unix_ms: u128,
    /// Number of results summarized.
    pub n_results: usize,
    /// Number of results flagged as outliers.
    pub n_outliers: usize,
}

/// One comparison in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryEntry {
    /// Data histogram label.
    pub data_name: String,
    /// Comparator name.
    pub comparator: String,
    /// Outlier verdict.
    pub is_outlier: bool,
    /// Summary statistics.
    pub info: BTreeMap<String, f64>,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Computation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

/// Build a summary artifact from a batch of results.
///
/// Ordering: outliers first, then lexicographic by histogram name and
/// comparator, for reproducible output.
pub fn summary_artifact(results: &[ComparisonResult]) -> Result<SummaryArtifact> {
    let mut entries: Vec<SummaryEntry> = results
        .iter()
        .map(|r| SummaryEntry {
            data_name: r.data_name.clone(),
            comparator: r.comparator.clone(),
            is_outlier: r.is_outlier,
            info: r.info.clone(),
        })
        .collect();
    entries.sort_by(|a, b| {
        b.is_outlier
            .cmp(&a.is_outlier)
            .then_with(|| a.data_name.cmp(&b.data_name))
            .then_with(|| a.comparator.cmp(&b.comparator))
    });

    Ok(SummaryArtifact {
        schema_version: "autodqm_summary_v0".to_string(),
        meta: SummaryMeta {
            tool: "autodqm".to_string(),
            tool_version: dqm_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
            n_results: results.len(),
            n_outliers: results.iter().filter(|r| r.is_outlier).count(),
        },
        entries,
    })
}
