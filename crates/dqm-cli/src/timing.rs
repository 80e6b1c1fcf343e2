//! Per-request timing map.
//!
//! Each timed step is recorded under `name<k>`, `k` being the first integer
//! suffix not yet used in this map. The map is owned by the request and
//! passed around explicitly.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

/// Step name → elapsed seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timings(BTreeMap<String, f64>);

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    /// First free key for `name`.
    pub fn unique_name(&self, name: &str) -> String {
        let mut k = 0usize;
        loop {
            let candidate = format!("{name}{k}");
            if !self.0.contains_key(&candidate) {
                return candidate;
            }
            k += 1;
        }
    }

    pub fn record(&mut self, name: &str, seconds: f64) {
        let key = self.unique_name(name);
        self.0.insert(key, seconds);
    }

    /// Run `f`, recording its wall time under `name`.
    pub fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = f();
        self.record(name, t0.elapsed().as_secs_f64());
        out
    }

    /// Record raw `(step name, seconds)` pairs, e.g. collected by a worker.
    pub fn extend(&mut self, steps: impl IntoIterator<Item = (String, f64)>) {
        for (name, seconds) in steps {
            self.record(&name, seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_get_increasing_suffixes() {
        let mut t = Timings::new();
        t.record("compare", 0.5);
        t.record("compare", 0.25);
        t.record("load", 1.0);
        assert_eq!(t.0.get("compare0").copied(), Some(0.5));
        assert_eq!(t.0.get("compare1").copied(), Some(0.25));
        assert_eq!(t.0.get("load0").copied(), Some(1.0));
        assert_eq!(t.unique_name("compare"), "compare2");
    }

    #[test]
    fn test_time_returns_value() {
        let mut t = Timings::new();
        let v = t.time("work", || 41 + 1);
        assert_eq!(v, 42);
        assert!(t.0.get("work0").copied().unwrap() >= 0.0);
    }

    #[test]
    fn test_extend_keeps_every_entry() {
        let mut a = Timings::new();
        a.record("compare_hRHGlobalm1_", 1.0);
        a.extend(vec![
            ("compare_hRHGlobalm1_".to_string(), 2.0),
            ("compare_hRHGlobalm1_".to_string(), 3.0),
        ]);
        assert_eq!(a.0.len(), 3);
        assert_eq!(a.0.get("compare_hRHGlobalm1_2").copied(), Some(3.0));
    }
}
