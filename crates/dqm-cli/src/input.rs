//! Histogram pair files and run configuration.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use dqm_compare::ComparatorRegistry;
use dqm_core::{ComparisonConfig, ComparisonConfigPatch, HistogramPair};
use serde::Deserialize;

/// `{ "pairs": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct PairsFile {
    pub pairs: Vec<HistogramPair>,
}

pub fn load_pairs(path: &Path) -> Result<Vec<HistogramPair>> {
    tracing::info!(path = %path.display(), "loading histogram pairs");
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let file: PairsFile =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    tracing::info!(pairs = file.pairs.len(), "histogram pairs loaded");
    Ok(file.pairs)
}

/// Which comparators to run and with which options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Comparator names; every registered comparator when absent.
    pub comparators: Option<Vec<String>>,
    /// Options shared by every pair.
    pub options: ComparisonConfig,
    /// Per-histogram overrides, keyed by data histogram name.
    pub histograms: BTreeMap<String, ComparisonConfigPatch>,
}

impl RunConfig {
    /// Load from YAML, or JSON when the extension is `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let cfg = if is_json {
            serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?
        } else {
            // Default: YAML (serde_yaml_ng).
            serde_yaml_ng::from_slice(&bytes)
                .with_context(|| format!("parse {}", path.display()))?
        };
        Ok(cfg)
    }

    /// Options for one histogram: the shared options with its overrides.
    pub fn config_for(&self, data_name: &str) -> ComparisonConfig {
        match self.histograms.get(data_name) {
            Some(patch) => patch.apply(&self.options),
            None => self.options.clone(),
        }
    }

    /// Comparator names to run, in order.
    pub fn comparator_names(&self, registry: &ComparatorRegistry) -> Vec<String> {
        match &self.comparators {
            Some(names) => names.clone(),
            None => registry.names().into_iter().map(str::to_string).collect(),
        }
    }

    /// Reject unknown comparators and out-of-range options up front.
    pub fn validate(&self, registry: &ComparatorRegistry) -> Result<()> {
        for name in self.comparator_names(registry) {
            if registry.get(&name).is_none() {
                return Err(dqm_core::Error::UnknownComparator(name).into());
            }
        }
        self.options.validate()?;
        for (hist, patch) in &self.histograms {
            patch
                .apply(&self.options)
                .validate()
                .with_context(|| format!("options for histogram '{hist}'"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqm_core::NormType;

    #[test]
    fn test_yaml_run_config() {
        let yaml = r#"
comparators: [pull_values]
options:
  min_entries: 1000
histograms:
  hRHGlobalm1:
    norm_type: row
"#;
        let cfg: RunConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let registry = ComparatorRegistry::builtin();
        cfg.validate(&registry).unwrap();
        assert_eq!(cfg.comparator_names(&registry), vec!["pull_values"]);

        let c = cfg.config_for("hRHGlobalm1");
        assert_eq!(c.norm_type, NormType::Row);
        assert_eq!(c.min_entries, 1000);
        let c = cfg.config_for("hORecHits");
        assert_eq!(c.norm_type, NormType::All);
    }

    #[test]
    fn test_default_runs_every_comparator() {
        let cfg = RunConfig::default();
        let registry = ComparatorRegistry::builtin();
        assert_eq!(cfg.comparator_names(&registry), vec!["pull_values", "ks_test"]);
        assert_eq!(cfg.config_for("anything"), ComparisonConfig::default());
    }

    #[test]
    fn test_unknown_comparator_rejected() {
        let cfg = RunConfig { comparators: Some(vec!["chi2".into()]), ..Default::default() };
        assert!(cfg.validate(&ComparatorRegistry::builtin()).is_err());
    }

    #[test]
    fn test_bad_override_rejected() {
        let yaml = "histograms:\n  hOWires:\n    pull_cap: -1\n";
        let cfg: RunConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(cfg.validate(&ComparatorRegistry::builtin()).is_err());
    }
}
