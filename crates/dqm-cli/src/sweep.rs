//! Comparator sweep over histogram pairs.

use std::time::Instant;

use anyhow::{Context, Result};
use dqm_compare::ComparatorRegistry;
use dqm_core::{ComparisonResult, HistogramPair};
use rayon::prelude::*;

use crate::input::RunConfig;
use crate::timing::Timings;

/// Results for one pair plus the raw `(step, seconds)` timings it produced.
type PairOutcome = (Vec<ComparisonResult>, Vec<(String, f64)>);

fn sweep_pair(
    registry: &ComparatorRegistry,
    names: &[String],
    run: &RunConfig,
    pair: &HistogramPair,
) -> Result<PairOutcome> {
    let config = run.config_for(&pair.data_name);
    let mut results = Vec::new();
    let mut steps = Vec::new();
    for name in names {
        let t0 = Instant::now();
        let out = registry
            .compare(name, pair, &config)
            .with_context(|| format!("{name} on '{}'", pair.data_name))?;
        steps.push((format!("{name}_{}_", pair.data_name), t0.elapsed().as_secs_f64()));
        if let Some(r) = out {
            results.push(r);
        }
    }
    Ok((results, steps))
}

/// Run `names` over every pair. Results come back in input order, then in
/// comparator order. `threads == 1` runs on the calling thread.
pub fn sweep(
    registry: &ComparatorRegistry,
    names: &[String],
    run: &RunConfig,
    pairs: &[HistogramPair],
    threads: usize,
    timings: &mut Timings,
) -> Result<Vec<ComparisonResult>> {
    let outcomes: Vec<PairOutcome> = if threads == 1 {
        pairs.iter().map(|p| sweep_pair(registry, names, run, p)).collect::<Result<_>>()?
    } else {
        if threads > 0 {
            // Best-effort; if a global pool already exists, keep going.
            let _ = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global();
        }
        pairs.par_iter().map(|p| sweep_pair(registry, names, run, p)).collect::<Result<_>>()?
    };

    let mut results = Vec::new();
    for (pair_results, steps) in outcomes {
        results.extend(pair_results);
        timings.extend(steps);
    }
    tracing::info!(
        pairs = pairs.len(),
        results = results.len(),
        outliers = results.iter().filter(|r| r.is_outlier).count(),
        "sweep done"
    );
    Ok(results)
}
