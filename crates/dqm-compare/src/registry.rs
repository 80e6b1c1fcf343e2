//! Name → comparator lookup.

use dqm_core::{
    Comparator, ComparisonConfig, ComparisonResult, Error, HistogramPair, Result,
};

use crate::ks::KsComparator;
use crate::pull::PullComparator;

/// Ordered set of named comparators.
///
/// Drivers sweep every comparator over every histogram pair; a comparator
/// that does not understand a pair's dimensionality simply yields nothing.
pub struct ComparatorRegistry {
    comparators: Vec<Box<dyn Comparator>>,
}

impl ComparatorRegistry {
    /// Registry with no comparators.
    pub fn empty() -> Self {
        Self { comparators: Vec::new() }
    }

    /// Registry with the built-in comparators: `pull_values`, `ks_test`.
    pub fn builtin() -> Self {
        Self { comparators: vec![Box::new(PullComparator), Box::new(KsComparator)] }
    }

    /// Add a comparator. Names must be unique.
    pub fn register(&mut self, comparator: Box<dyn Comparator>) -> Result<()> {
        if self.get(comparator.name()).is_some() {
            return Err(Error::Validation(format!(
                "comparator '{}' is already registered",
                comparator.name()
            )));
        }
        self.comparators.push(comparator);
        Ok(())
    }

    /// Look up a comparator by name.
    pub fn get(&self, name: &str) -> Option<&dyn Comparator> {
        self.comparators.iter().find(|c| c.name() == name).map(|c| c.as_ref())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.comparators.iter().map(|c| c.name()).collect()
    }

    /// Run the named comparator. `Ok(None)` means not applicable.
    pub fn compare(
        &self,
        name: &str,
        pair: &HistogramPair,
        config: &ComparisonConfig,
    ) -> Result<Option<ComparisonResult>> {
        let comparator = self.get(name).ok_or_else(|| Error::UnknownComparator(name.to_string()))?;
        comparator.compare(pair, config)
    }

    /// Run every registered comparator over `pair`, keeping the applicable
    /// results in registration order.
    pub fn sweep(
        &self,
        pair: &HistogramPair,
        config: &ComparisonConfig,
    ) -> Result<Vec<ComparisonResult>> {
        let mut out = Vec::new();
        for c in &self.comparators {
            if let Some(r) = c.compare(pair, config)? {
                out.push(r);
            }
        }
        Ok(out)
    }
}

impl Default for ComparatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparatorRegistry").field("comparators", &self.names()).finish()
    }
}
