use parking_lot::Mutex;

use crate::config::PercentileMethod;
use crate::models::LatencyStats;
use crate::stats_utils::{percentile_sorted, round2, sort_samples};

// Fixed-capacity ring of samples; `head` is the next slot to overwrite once full
struct Ring {
    samples: Vec<f64>,
    head: usize,
}

/// Bounded history of the most recent latency samples (milliseconds).
///
/// The bound is by count, not time: once `capacity` samples are stored the
/// oldest one is overwritten.
pub struct RollingLatencyRecorder {
    capacity: usize,
    method: PercentileMethod,
    ring: Mutex<Ring>,
}

impl RollingLatencyRecorder {
    pub fn new(capacity: usize, method: PercentileMethod) -> Self {
        Self {
            capacity,
            method,
            ring: Mutex::new(Ring {
                samples: Vec::with_capacity(capacity),
                head: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ring.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // negative and NaN samples are stored as 0
    pub fn record(&self, sample_ms: f64) {
        let sample = sample_ms.max(0.0);
        let mut ring = self.ring.lock();
        if ring.samples.len() < self.capacity {
            ring.samples.push(sample);
        } else {
            let head = ring.head;
            ring.samples[head] = sample;
            ring.head = (head + 1) % self.capacity;
        }
    }

    pub fn stats(&self) -> LatencyStats {
        // copy out, sort without holding the lock
        let mut samples = self.ring.lock().samples.clone();
        if samples.is_empty() {
            return LatencyStats::default();
        }
        sort_samples(&mut samples);
        LatencyStats {
            p50: round2(percentile_sorted(&samples, 50.0, self.method)),
            p95: round2(percentile_sorted(&samples, 95.0, self.method)),
        }
    }
}
