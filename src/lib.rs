//! Request admission and rolling metrics for a prediction service.
//!
//! [`coordinator::RequestCoordinator`] gates each request through a sliding
//! window rate limiter, hands it to a validator and a scorer, then records
//! its latency, its fairness bucket and a recent-event entry. Every call
//! returns the prediction together with a fresh metrics snapshot.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fairness;
pub mod handlers;
pub mod latency;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod recent;
pub mod scoring;
pub mod state;
pub mod stats_utils;

pub use config::{Args, Limits, PercentileMethod};
pub use coordinator::{RequestCoordinator, RequestStage};
pub use error::{ErrorKind, GatewayError};
pub use scoring::{DeterministicIncomeModel, RangeValidator, Scorer, Validator};
