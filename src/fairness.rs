use dashmap::DashMap;

use crate::models::{FairnessEntry, FairnessSnapshot};
use crate::stats_utils::{ratio_u64, round2};

// Running counts for one category
#[derive(Debug, Clone, Copy, Default)]
pub struct FairnessBucket {
    pub count: u64,
    pub positive_count: u64,
}

impl FairnessBucket {
    pub fn positive_rate(&self) -> f64 {
        round2(ratio_u64(self.positive_count, self.count))
    }
}

// Per-category outcome counts over all served requests.
// Buckets are created on first update and never removed.
#[derive(Default)]
pub struct FairnessAggregator {
    buckets: DashMap<String, FairnessBucket>, // category -> bucket
}

impl FairnessAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, category: &str, positive: bool) {
        // the entry guard holds the shard lock for the whole increment
        let mut bucket = self.buckets.entry(category.to_string()).or_default();
        bucket.count += 1;
        if positive {
            bucket.positive_count += 1;
        }
    }

    pub fn bucket(&self, category: &str) -> Option<FairnessBucket> {
        self.buckets.get(category).map(|b| *b)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn snapshot(&self) -> FairnessSnapshot {
        self.buckets
            .iter()
            .map(|entry| {
                let bucket = entry.value();
                (
                    entry.key().clone(),
                    FairnessEntry {
                        count: bucket.count,
                        positive_rate: bucket.positive_rate(),
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_two_requests_one_positive() {
        let agg = FairnessAggregator::new();
        agg.update("white", true);
        agg.update("white", false);

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot["white"],
            FairnessEntry { count: 2, positive_rate: 0.5 }
        );
    }

    #[test]
    fn test_empty_until_first_update() {
        let agg = FairnessAggregator::new();
        assert!(agg.is_empty());
        assert!(agg.snapshot().is_empty());
        assert!(agg.bucket("black").is_none());
    }

    #[test]
    fn test_categories_independent() {
        let agg = FairnessAggregator::new();
        agg.update("asian-pac-islander", true);
        agg.update("black", false);
        agg.update("black", false);
        agg.update("other", true);
        agg.update("other", true);
        agg.update("other", false);

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["asian-pac-islander"].positive_rate, 1.0);
        assert_eq!(snapshot["black"].positive_rate, 0.0);
        assert_eq!(snapshot["other"], FairnessEntry { count: 3, positive_rate: 0.67 });
    }

    #[test]
    fn test_rate_matches_counts_and_stays_in_unit_interval() {
        let agg = FairnessAggregator::new();
        for i in 0..97u64 {
            agg.update("white", i % 7 == 0);
        }
        let bucket = agg.bucket("white").unwrap();
        assert!(bucket.positive_count <= bucket.count);
        let entry = agg.snapshot()["white"];
        let expected = (bucket.positive_count as f64 / bucket.count as f64 * 100.0).round() / 100.0;
        assert_eq!(entry.positive_rate, expected);
        assert!((0.0..=1.0).contains(&entry.positive_rate));
    }

    #[test]
    fn test_concurrent_updates_lose_nothing() {
        let agg = Arc::new(FairnessAggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let agg = Arc::clone(&agg);
                thread::spawn(move || {
                    for i in 0..250 {
                        agg.update(if t % 2 == 0 { "white" } else { "black" }, i % 2 == 0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let white = agg.bucket("white").unwrap();
        assert_eq!(white.count, 1000);
        assert_eq!(white.positive_count, 500);
        assert_eq!(agg.bucket("black").unwrap().count, 1000);
    }
}
