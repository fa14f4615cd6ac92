use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::error::{GatewayError, Result};

// How percentiles are read off the sorted latency samples
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentileMethod {
    // interpolate between the two neighbouring order statistics
    #[default]
    Linear,
    // take the order statistic closest to the rank
    Nearest,
}

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "rai-ops-gateway")]
#[command(about = "Rate-limited prediction service with rolling latency and fairness metrics")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 30)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Number of latency samples kept for percentiles
    #[arg(long, default_value_t = 300)]
    pub latency_window: usize,

    // Number of served requests kept in the recent log
    #[arg(long, default_value_t = 10)]
    pub recent_capacity: usize,

    #[arg(long, value_enum, default_value_t = PercentileMethod::Linear)]
    pub percentile_method: PercentileMethod,
}

/// Tunables the request coordinator is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_requests_per_window: usize,
    pub window: Duration,
    pub latency_window: usize,
    pub recent_capacity: usize,
    pub percentile_method: PercentileMethod,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_requests_per_window: 30,
            window: Duration::from_secs(60),
            latency_window: 300,
            recent_capacity: 10,
            percentile_method: PercentileMethod::Linear,
        }
    }
}

impl Limits {
    pub fn validate(&self) -> Result<()> {
        if self.max_requests_per_window == 0 {
            return Err(GatewayError::Config("rate limit must be at least 1".to_string()));
        }
        if self.window.is_zero() {
            return Err(GatewayError::Config("rate window must be non-zero".to_string()));
        }
        if self.latency_window == 0 {
            return Err(GatewayError::Config("latency window must be at least 1".to_string()));
        }
        if self.recent_capacity == 0 {
            return Err(GatewayError::Config("recent capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl From<&Args> for Limits {
    fn from(args: &Args) -> Self {
        Self {
            max_requests_per_window: args.rate_limit,
            window: Duration::from_secs(args.rate_window),
            latency_window: args.latency_window,
            recent_capacity: args.recent_capacity,
            percentile_method: args.percentile_method,
        }
    }
}
