#![allow(dead_code)]

use order_pool::{Item, PoolConfig, RunSummary};
use std::collections::HashMap;
use std::time::Duration;

/// Config with a short processing delay so runs finish quickly but workers
/// still interleave.
pub fn quick_config(workers: usize, items: usize) -> PoolConfig {
    PoolConfig::builder()
        .num_workers(workers)
        .num_items(items)
        .max_delay(Duration::from_micros(200))
        .seed(42)
        .build()
}

/// Asserts that every order `0..n` was completed exactly once.
pub fn assert_exactly_once(summary: &RunSummary, n: usize) {
    let mut multiplicity: HashMap<Item, usize> = HashMap::new();
    for &item in &summary.completed {
        *multiplicity.entry(item).or_default() += 1;
    }

    assert_eq!(multiplicity.len(), n, "distinct completions");
    for item in 0..n as Item {
        assert_eq!(
            multiplicity.get(&item).copied(),
            Some(1),
            "order {} completed wrong number of times",
            item
        );
    }
    assert!(
        summary.report.is_consistent(n),
        "report violations: {:?}",
        summary.report.violations(n)
    );
}
