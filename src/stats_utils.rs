use std::cmp::Ordering;

use crate::config::PercentileMethod;

// Round to 2 decimals for presentation; storage keeps full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn ratio_u64(num: u64, denom: u64) -> f64 {
    if denom == 0 {
        0.0
    } else {
        (num as f64 / denom as f64).clamp(0.0, 1.0)
    }
}

pub fn sort_samples(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Percentile `p` (0..=100) of already sorted samples. Empty input yields 0.
pub fn percentile_sorted(sorted: &[f64], p: f64, method: PercentileMethod) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (sorted.len() - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
    match method {
        PercentileMethod::Nearest => sorted[rank.round() as usize],
        PercentileMethod::Linear => {
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
