use crate::error::{GatewayError, Result};
use crate::models::{Education, IncomeLabel, Prediction, Sex};
use crate::stats_utils::round2;

// Scoring collaborator. Must be pure: called once per validated request,
// outside every coordinator lock.
pub trait Scorer: Send + Sync {
    fn score(&self, age: i64, education: Education, hours_per_week: i64, sex: Sex) -> Prediction;
}

// Input validation collaborator
pub trait Validator: Send + Sync {
    fn validate(&self, age: i64, hours_per_week: i64) -> Result<()>;
}

/// Rule-based stand-in for an income model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicIncomeModel;

impl Scorer for DeterministicIncomeModel {
    fn score(&self, age: i64, education: Education, hours_per_week: i64, sex: Sex) -> Prediction {
        let mut score: f64 = 0.0;

        if age >= 40 {
            score += 0.25;
        }
        if hours_per_week >= 40 {
            score += 0.25;
        }
        score += match education {
            Education::Masters | Education::Doctorate => 0.30,
            Education::Bachelors => 0.15,
            Education::HsGrad => 0.0,
        };
        if sex == Sex::Male {
            score += 0.05;
        }

        let score = score.min(0.95);
        let label = if score >= 0.5 {
            IncomeLabel::Above50K
        } else {
            IncomeLabel::AtMost50K
        };
        Prediction {
            label,
            confidence: round2(score),
        }
    }
}

// Inclusive range checks on age and weekly hours
#[derive(Debug, Clone, Copy)]
pub struct RangeValidator {
    pub age: (i64, i64),
    pub hours_per_week: (i64, i64),
}

impl Default for RangeValidator {
    fn default() -> Self {
        Self {
            age: (18, 90),
            hours_per_week: (1, 80),
        }
    }
}

impl Validator for RangeValidator {
    fn validate(&self, age: i64, hours_per_week: i64) -> Result<()> {
        let (min_age, max_age) = self.age;
        if !(min_age..=max_age).contains(&age) {
            return Err(GatewayError::InvalidInput(format!(
                "age must be in [{}, {}], got {}",
                min_age, max_age, age
            )));
        }
        let (min_hours, max_hours) = self.hours_per_week;
        if !(min_hours..=max_hours).contains(&hours_per_week) {
            return Err(GatewayError::InvalidInput(format!(
                "hours_per_week must be in [{}, {}], got {}",
                min_hours, max_hours, hours_per_week
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_components() {
        let model = DeterministicIncomeModel;

        let p = model.score(30, Education::HsGrad, 20, Sex::Female);
        assert_eq!(p, Prediction { label: IncomeLabel::AtMost50K, confidence: 0.0 });

        // 0.25 + 0.25 = 0.5 hits the threshold
        let p = model.score(40, Education::HsGrad, 40, Sex::Female);
        assert_eq!(p, Prediction { label: IncomeLabel::Above50K, confidence: 0.5 });

        let p = model.score(25, Education::Bachelors, 45, Sex::Male);
        assert_eq!(p, Prediction { label: IncomeLabel::AtMost50K, confidence: 0.45 });
    }

    #[test]
    fn test_score_maximum() {
        let p = DeterministicIncomeModel.score(50, Education::Doctorate, 60, Sex::Male);
        assert_eq!(p.confidence, 0.85);
        assert!(p.label.is_positive());
    }

    #[test]
    fn test_validator_bounds_inclusive() {
        let v = RangeValidator::default();
        assert!(v.validate(18, 1).is_ok());
        assert!(v.validate(90, 80).is_ok());
        assert!(matches!(v.validate(17, 40), Err(GatewayError::InvalidInput(_))));
        assert!(matches!(v.validate(91, 40), Err(GatewayError::InvalidInput(_))));
        assert!(matches!(v.validate(30, 0), Err(GatewayError::InvalidInput(_))));

        let err = v.validate(30, 81).unwrap_err();
        assert!(err.to_string().contains("hours_per_week"));
    }
}
