use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Education {
    #[serde(rename = "HS-grad")]
    HsGrad,
    Bachelors,
    Masters,
    Doctorate,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

// Scoring outcome; `>50K` is the favourable label for fairness accounting
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeLabel {
    #[serde(rename = ">50K")]
    Above50K,
    #[serde(rename = "<=50K")]
    AtMost50K,
}

impl IncomeLabel {
    pub fn is_positive(&self) -> bool {
        matches!(self, IncomeLabel::Above50K)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeLabel::Above50K => ">50K",
            IncomeLabel::AtMost50K => "<=50K",
        }
    }
}

// Prediction request as sent by a client
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub age: i64,
    pub education: Education,
    pub hours_per_week: i64,
    pub sex: Sex,
    // fairness bucket key, free-form
    pub race: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: IncomeLabel,
    pub confidence: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencyStats {
    pub p50: f64,
    pub p95: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FairnessEntry {
    pub count: u64,
    pub positive_rate: f64,
}

pub type FairnessSnapshot = HashMap<String, FairnessEntry>;

// One served request, as kept in the recent log
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RecentEvent {
    // unix seconds
    pub time: i64,
    pub label: IncomeLabel,
    pub confidence: f64,
    pub latency_ms: f64,
    pub education: Education,
    pub sex: Sex,
    pub race: String,
    pub age: i64,
    pub hours_per_week: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct WindowUsage {
    pub count: usize,
    pub max_window: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct LimitsEcho {
    pub rate_limit_rpm: usize,
    pub window_seconds: u64,
    pub latency_window: usize,
    pub recent_predictions: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub window: WindowUsage,
    pub latency_ms: LatencyStats,
    pub error_rate: f64,
    pub limits: LimitsEcho,
    pub request_id: String,
}

// Metrics, fairness audit and recent events, without a prediction
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StatsResponse {
    pub metrics: MetricsSnapshot,
    pub fairness: FairnessSnapshot,
    pub recent: Vec<RecentEvent>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PredictResponse {
    pub label: IncomeLabel,
    pub confidence: f64,
    pub latency_ms: f64,
    pub metrics: MetricsSnapshot,
    pub fairness: FairnessSnapshot,
    pub recent: Vec<RecentEvent>,
}
