use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::Limits;
use crate::error::Result;
use crate::fairness::FairnessAggregator;
use crate::latency::RollingLatencyRecorder;
use crate::metrics::{PREDICTIONS, REQUEST_LATENCY, REQUEST_REJECTED, REQUEST_TOTAL, WINDOW_OCCUPANCY};
use crate::models::{
    LimitsEcho, MetricsSnapshot, PredictRequest, PredictResponse, RecentEvent, StatsResponse,
    WindowUsage,
};
use crate::rate_limit::SlidingWindowLimiter;
use crate::recent::RecentEventLog;
use crate::scoring::{DeterministicIncomeModel, RangeValidator, Scorer, Validator};
use crate::stats_utils::{ratio_u64, round2};

/// Where a request is in its lifecycle. A failure ends processing at the
/// last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    RateChecked,
    Validated,
    Scored,
    Recorded,
    Done,
}

/// Single entry point for prediction requests.
///
/// Owns the rate limiter, the latency recorder, the fairness aggregator and
/// the recent-event log. Each of them has its own lock, held only for the
/// duration of one operation on it; scoring and validation run with no lock
/// held. Snapshots taken while other requests are in flight may interleave
/// with their updates.
pub struct RequestCoordinator {
    limits: Limits,
    limiter: SlidingWindowLimiter,
    latency: RollingLatencyRecorder,
    fairness: FairnessAggregator,
    recent: RecentEventLog,
    scorer: Box<dyn Scorer>,
    validator: Box<dyn Validator>,
    received: AtomicU64,
    failed: AtomicU64,
    sequence: AtomicU64,
}

impl RequestCoordinator {
    pub fn new(
        limits: Limits,
        scorer: Box<dyn Scorer>,
        validator: Box<dyn Validator>,
    ) -> Result<Self> {
        limits.validate()?;
        Ok(Self {
            limits,
            limiter: SlidingWindowLimiter::new(limits.max_requests_per_window, limits.window),
            latency: RollingLatencyRecorder::new(limits.latency_window, limits.percentile_method),
            fairness: FairnessAggregator::new(),
            recent: RecentEventLog::new(limits.recent_capacity),
            scorer,
            validator,
            received: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            sequence: AtomicU64::new(0),
        })
    }

    // Deterministic income model with the default age/hours ranges
    pub fn with_reference_collaborators(limits: Limits) -> Result<Self> {
        Self::new(
            limits,
            Box::new(DeterministicIncomeModel),
            Box::new(RangeValidator::default()),
        )
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn handle(&self, req: &PredictRequest) -> Result<PredictResponse> {
        let start = Instant::now();
        REQUEST_TOTAL.inc();
        self.received.fetch_add(1, Ordering::Relaxed);

        let mut stage = RequestStage::Received;
        let result = self.process(req, start, &mut stage);

        if let Err(e) = &result {
            self.failed.fetch_add(1, Ordering::Relaxed);
            REQUEST_REJECTED.with_label_values(&[e.kind().as_str()]).inc();
            warn!(stage = ?stage, kind = e.kind().as_str(), error = %e, "request rejected");
        }
        result
    }

    fn process(
        &self,
        req: &PredictRequest,
        start: Instant,
        stage: &mut RequestStage,
    ) -> Result<PredictResponse> {
        self.limiter.admit()?;
        advance(stage, RequestStage::RateChecked);

        self.validator.validate(req.age, req.hours_per_week)?;
        advance(stage, RequestStage::Validated);

        let prediction = self
            .scorer
            .score(req.age, req.education, req.hours_per_week, req.sex);
        advance(stage, RequestStage::Scored);

        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let latency_ms = round2(elapsed_ms);

        self.latency.record(elapsed_ms);
        self.fairness.update(&req.race, prediction.label.is_positive());
        self.recent.push(RecentEvent {
            time: Utc::now().timestamp(),
            label: prediction.label,
            confidence: prediction.confidence,
            latency_ms,
            education: req.education,
            sex: req.sex,
            race: req.race.clone(),
            age: req.age,
            hours_per_week: req.hours_per_week,
        });
        REQUEST_LATENCY.observe(elapsed.as_secs_f64());
        PREDICTIONS.with_label_values(&[prediction.label.as_str()]).inc();
        advance(stage, RequestStage::Recorded);

        let stats = self.snapshot();
        advance(stage, RequestStage::Done);

        Ok(PredictResponse {
            label: prediction.label,
            confidence: prediction.confidence,
            latency_ms,
            metrics: stats.metrics,
            fairness: stats.fairness,
            recent: stats.recent,
        })
    }

    /// Current metrics, fairness audit and recent events. Touches no
    /// recorder state; the request id is freshly generated.
    pub fn snapshot(&self) -> StatsResponse {
        let occupancy = self.limiter.occupancy();
        WINDOW_OCCUPANCY.set(occupancy as f64);

        let recent = self.recent.snapshot();
        let metrics = MetricsSnapshot {
            window: WindowUsage {
                count: occupancy,
                max_window: self.limiter.max_requests(),
            },
            latency_ms: self.latency.stats(),
            error_rate: self.error_rate(),
            limits: LimitsEcho {
                rate_limit_rpm: self.limits.max_requests_per_window,
                window_seconds: self.limits.window.as_secs(),
                latency_window: self.latency.capacity(),
                recent_predictions: recent.len(),
            },
            request_id: self.next_request_id(),
        };

        StatsResponse {
            metrics,
            fairness: self.fairness.snapshot(),
            recent,
        }
    }

    // failed / received over the process lifetime
    pub fn error_rate(&self) -> f64 {
        round2(ratio_u64(
            self.failed.load(Ordering::Relaxed),
            self.received.load(Ordering::Relaxed),
        ))
    }

    // 8 hex chars from sequence number + wall clock
    fn next_request_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(seq.to_le_bytes());
        hasher.update(nanos.to_le_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..8].to_string()
    }
}

fn advance(stage: &mut RequestStage, next: RequestStage) {
    let from = *stage;
    debug!(from = ?from, to = ?next, "request stage");
    *stage = next;
}
