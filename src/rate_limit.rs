use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::{GatewayError, Result};

// Sliding-window admission: at most `max_requests` admitted within any `window`.
// Timestamps are kept oldest-first and evicted lazily on each check.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            // never holds more than max_requests entries
            admitted: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn admit(&self) -> Result<()> {
        self.admit_at(Instant::now())
    }

    /// Evict, check and append as one step under the window lock.
    ///
    /// A rejected call records nothing, so hammering a full window does not
    /// extend it.
    pub fn admit_at(&self, now: Instant) -> Result<()> {
        let mut admitted = self.admitted.lock();

        while let Some(&oldest) = admitted.front() {
            if now.saturating_duration_since(oldest) > self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }

        if admitted.len() >= self.max_requests {
            return Err(GatewayError::RateLimitExceeded {
                in_window: admitted.len(),
                max: self.max_requests,
            });
        }

        admitted.push_back(now);
        Ok(())
    }

    pub fn occupancy(&self) -> usize {
        self.occupancy_at(Instant::now())
    }

    // read-only count of admissions still inside the window
    pub fn occupancy_at(&self, now: Instant) -> usize {
        let admitted = self.admitted.lock();
        admitted
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) <= self.window)
            .count()
    }
}
